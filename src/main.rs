//! Backend entry-point: wires HTTP endpoints, persistence, and uploads.

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use agrimarket_backend::inbound::http::HealthState;
use agrimarket_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use agrimarket_backend::outbound::storage::DiskImageStore;
use agrimarket_backend::server::{DiagnosisConfig, ServerConfig, Settings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::from_env().map_err(std::io::Error::other)?;

    run_pending_migrations(&settings.database_url)
        .await
        .map_err(std::io::Error::other)?;
    let db_pool = DbPool::new(PoolConfig::new(&settings.database_url))
        .await
        .map_err(std::io::Error::other)?;

    DiskImageStore::new(&settings.upload_dir)
        .ensure_root()
        .await
        .map_err(std::io::Error::other)?;

    let diagnosis = DiagnosisConfig::new(settings.diagnosis_api_key)
        .map_err(std::io::Error::other)?
        .with_endpoint(settings.diagnosis_endpoint)
        .with_timeout(settings.diagnosis_timeout);

    let config = ServerConfig::new(settings.bind_addr, db_pool, diagnosis)
        .with_upload_dir(settings.upload_dir)
        .with_static_root(settings.static_root);

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
