//! Transport-agnostic domain layer: entities, validation, use-cases, ports.

pub mod account;
pub mod account_service;
pub mod error;
pub mod listing;
pub mod listing_service;
pub mod ports;
pub mod prediction;
pub mod prediction_service;

pub use account::{
    AccountId, AccountIdentity, AccountValidationError, Password, Phone, Role, Username,
};
pub use account_service::{AccountService, AuthError, RegistrationError};
pub use error::{DomainError, DomainError as Error, ErrorCode};
pub use listing::{Listing, ListingDraft, ListingId, ListingLimits};
pub use listing_service::{ListingError, ListingService};
pub use prediction::{Diagnosis, NewPrediction, PredictionId, PredictionRecord};
pub use prediction_service::{AnalysisError, PredictionError, PredictionService};

/// Response header carrying the per-request trace identifier.
pub const TRACE_ID_HEADER: &str = "Trace-Id";
