//! Inbound HTTP adapter: handlers, error envelope, and shared state.

pub mod accounts;
pub mod error;
pub mod health;
pub mod listings;
pub mod pages;
pub mod predictions;
pub mod state;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{ApiError, ApiResult};
pub use health::HealthState;
pub use state::HttpState;
