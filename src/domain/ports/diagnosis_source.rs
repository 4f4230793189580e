//! Driven port for the external generative-AI diagnosis service.
//!
//! Adapters own all transport detail; the domain sees a single call that
//! either yields a [`Diagnosis`] or a typed failure. There is no retry at
//! any layer: one upstream failure is surfaced to the caller as-is.

use async_trait::async_trait;

use crate::domain::prediction::Diagnosis;

use super::define_port_error;

define_port_error! {
    /// Failures raised by diagnosis source adapters.
    pub enum DiagnosisSourceError {
        /// The upstream call exceeded its deadline.
        Timeout { message: String } => "diagnosis service timed out: {message}",
        /// Network-level failure or non-success status from the upstream.
        Transport { message: String } => "diagnosis service transport failure: {message}",
        /// The upstream reply could not be parsed into the expected shape.
        Decode { message: String } => "diagnosis reply could not be decoded: {message}",
    }
}

/// Inputs for a single diagnosis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisRequest {
    /// Stored reference to the uploaded image, either a public URL or a
    /// server-local path.
    pub image_ref: String,
    /// Free-text symptom description supplied at upload time.
    pub description: String,
    /// Language the reply should be written in.
    pub language: String,
}

/// Domain port wrapping one outbound call to the diagnosis service.
#[async_trait]
pub trait DiagnosisSource: Send + Sync {
    /// Request a diagnosis for the uploaded image and description.
    async fn diagnose(&self, request: &DiagnosisRequest)
    -> Result<Diagnosis, DiagnosisSourceError>;
}
