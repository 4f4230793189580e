//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! domain services and ports and stay testable without real infrastructure.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::ports::ImageStore;
use crate::domain::{AccountService, ListingService, PredictionService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<AccountService>,
    pub listings: Arc<ListingService>,
    pub predictions: Arc<PredictionService>,
    pub images: Arc<dyn ImageStore>,
    /// Root directory of the static page collection.
    pub static_root: PathBuf,
}
