//! PostgreSQL persistence adapters built on Diesel.

pub mod diesel_account_repository;
mod diesel_error_mapping;
pub mod diesel_listing_repository;
pub mod diesel_prediction_repository;
pub mod migrations;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_prediction_repository::DieselPredictionRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
