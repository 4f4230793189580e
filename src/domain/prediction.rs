//! Plant-symptom prediction data model.
//!
//! A record is created when an image is uploaded and moves to its terminal
//! diagnosed state when the external analysis completes. Re-analysis is
//! allowed and overwrites the stored diagnosis.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Database identifier of a prediction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PredictionId(i32);

impl PredictionId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one diagnosis call.
///
/// The structured shape is canonical; `FreeText` is the declared fallback
/// for replies the service does not return as structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Diagnosis {
    #[serde(rename_all = "camelCase")]
    Structured {
        disease_name: String,
        cause: String,
        explanation: String,
        remedy: String,
    },
    FreeText {
        details: String,
    },
}

/// Prediction fields persisted at upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrediction {
    pub image_path: String,
    pub description: String,
    pub language: String,
}

/// One uploaded-image diagnosis request and its eventual result.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: PredictionId,
    pub image_path: String,
    pub description: String,
    pub language: String,
    /// `None` until the first successful analysis.
    pub diagnosis: Option<Diagnosis>,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Whether the record has reached its diagnosed state.
    pub fn is_diagnosed(&self) -> bool {
        self.diagnosis.is_some()
    }
}
