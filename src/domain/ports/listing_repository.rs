//! Port abstraction for listing persistence adapters.

use async_trait::async_trait;

use crate::domain::listing::{Listing, ListingId, NewListing};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ListingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing repository query failed: {message}",
    }
}

/// Persistence port for product listings.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Insert a listing and return its id.
    async fn insert(&self, listing: &NewListing) -> Result<ListingId, ListingPersistenceError>;

    /// Return every listing, most recent id first.
    async fn list_newest_first(&self) -> Result<Vec<Listing>, ListingPersistenceError>;
}
