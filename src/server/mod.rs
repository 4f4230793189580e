//! Server construction and middleware wiring.

mod config;

pub use config::{DiagnosisConfig, ServerConfig, Settings, SettingsError};

use std::path::PathBuf;
use std::sync::Arc;

use actix_files::Files;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{AccountService, ListingService, PredictionService};
use crate::inbound::http::accounts::{login, register};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::listings::{create_listing, list_listings};
use crate::inbound::http::pages::{index, page};
use crate::inbound::http::predictions::{analyze_prediction, create_prediction, get_prediction};
use crate::inbound::http::state::HttpState;
use crate::outbound::diagnosis::DiagnosisHttpSource;
use crate::outbound::password::BcryptPasswordHasher;
use crate::outbound::persistence::{
    DieselAccountRepository, DieselListingRepository, DieselPredictionRepository,
};
use crate::outbound::storage::DiskImageStore;
#[cfg(debug_assertions)]
use utoipa::OpenApi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    upload_dir: PathBuf,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        upload_dir,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(register)
        .service(login)
        .service(create_listing)
        .service(list_listings)
        .service(create_prediction)
        .service(analyze_prediction)
        .service(get_prediction)
        .service(ready)
        .service(live)
        .service(Files::new("/uploads", upload_dir));

    #[cfg(debug_assertions)]
    let app = app.route(
        "/api-docs/openapi.json",
        web::get().to(|| async { web::Json(ApiDoc::openapi()) }),
    );

    // The page catch-all goes last so it only sees unclaimed paths.
    app.service(index).service(page)
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the outbound HTTP client cannot be
/// built or the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        db_pool,
        diagnosis,
        upload_dir,
        static_root,
        listing_limits,
        bcrypt_cost,
    } = config;

    let hasher = match bcrypt_cost {
        Some(cost) => BcryptPasswordHasher::with_cost(cost),
        None => BcryptPasswordHasher::new(),
    };
    let accounts = Arc::new(AccountService::new(
        Arc::new(DieselAccountRepository::new(db_pool.clone())),
        Arc::new(hasher),
    ));
    let listings = Arc::new(ListingService::new(
        Arc::new(DieselListingRepository::new(db_pool.clone())),
        listing_limits,
    ));
    let diagnosis_source =
        DiagnosisHttpSource::new(diagnosis.endpoint, diagnosis.api_key, diagnosis.timeout)
            .map_err(|err| {
                std::io::Error::other(format!("diagnosis client construction failed: {err}"))
            })?;
    let predictions = Arc::new(PredictionService::new(
        Arc::new(DieselPredictionRepository::new(db_pool)),
        Arc::new(diagnosis_source),
    ));

    let http_state = web::Data::new(HttpState {
        accounts,
        listings,
        predictions,
        images: Arc::new(DiskImageStore::new(upload_dir.clone())),
        static_root,
    });

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            upload_dir: upload_dir.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
