//! Wire types for the generative diagnosis service.
//!
//! The request body carries one text part per prompt; the reply nests the
//! generated text under candidates/content/parts. Both shapes tolerate
//! missing fields so a sparse reply decodes instead of erroring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<ContentDto>,
}

impl GenerateContentRequest {
    /// Wrap one prompt string into the single-part request shape.
    pub fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![ContentDto {
                parts: vec![PartDto { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ContentDto {
    #[serde(default)]
    pub parts: Vec<PartDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PartDto {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateDto {
    pub content: Option<ContentDto>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if any.
    pub fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()
            .map(|part| part.text)
    }
}

/// Structured diagnosis as the model is asked to emit it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredDiagnosisDto {
    pub disease_name: String,
    pub cause: String,
    pub explanation: String,
    pub remedy: String,
}
