//! Domain ports: the seams between use-cases and infrastructure adapters.

mod account_repository;
mod diagnosis_source;
mod image_store;
mod listing_repository;
pub(crate) mod macros;
mod password_hasher;
mod prediction_repository;

pub(crate) use macros::define_port_error;

pub use account_repository::{AccountPersistenceError, AccountRepository};
pub use diagnosis_source::{DiagnosisRequest, DiagnosisSource, DiagnosisSourceError};
pub use image_store::{ImageStore, ImageStoreError, StoredImage};
pub use listing_repository::{ListingPersistenceError, ListingRepository};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use prediction_repository::{PredictionPersistenceError, PredictionRepository};
