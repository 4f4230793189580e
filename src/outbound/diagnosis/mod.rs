//! Outbound adapter for the generative diagnosis service.

mod dto;
mod http_source;

pub use http_source::DiagnosisHttpSource;
