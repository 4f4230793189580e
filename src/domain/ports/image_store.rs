//! Port abstraction for the uploaded-image file store.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by image store adapters.
    pub enum ImageStoreError {
        /// The upload could not be written to storage.
        Io { message: String } => "image store write failed: {message}",
    }
}

/// Reference to a stored upload, as persisted with listings and predictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Path the file is served back under, e.g. `/uploads/1679509123456.jpg`.
    pub public_path: String,
}

/// Domain port for persisting uploaded image bytes.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the upload and return the public path it will be served from.
    ///
    /// `original_name` is only consulted for its file extension.
    async fn store(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, ImageStoreError>;
}
