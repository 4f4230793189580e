//! Reqwest-backed diagnosis source adapter.
//!
//! This adapter owns transport details only: prompt construction, the API
//! key query parameter, timeout and HTTP error mapping, and decoding of the
//! generated text into a diagnosis.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{DiagnosisRequest, DiagnosisSource, DiagnosisSourceError};
use crate::domain::prediction::Diagnosis;

use super::dto::{GenerateContentRequest, GenerateContentResponse, StructuredDiagnosisDto};

/// Diagnosis source adapter performing HTTP POST requests against one
/// generative endpoint.
pub struct DiagnosisHttpSource {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl DiagnosisHttpSource {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout. Calls are not retried; a slow upstream surfaces as a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl DiagnosisSource for DiagnosisHttpSource {
    async fn diagnose(
        &self,
        request: &DiagnosisRequest,
    ) -> Result<Diagnosis, DiagnosisSourceError> {
        let prompt = build_prompt(request);
        let body = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        parse_diagnosis(bytes.as_ref())
    }
}

/// Build the prompt for one stored record.
///
/// When the image reference is a URL the service can fetch, the prompt asks
/// for an image-based diagnosis; a local path is unreachable from the
/// service, so the prompt falls back to the symptom description alone.
fn build_prompt(request: &DiagnosisRequest) -> String {
    let format_clause = format!(
        "Respond in {language} with only a JSON object holding the keys \
         diseaseName, cause, explanation and remedy. Do not add any text \
         outside the JSON object.",
        language = request.language
    );

    if is_fetchable_url(&request.image_ref) {
        format!(
            "You are a plant pathologist. Diagnose the plant disease shown \
             in the image at {image}. The grower describes the symptoms as: \
             {description}. {format_clause}",
            image = request.image_ref,
            description = request.description,
        )
    } else {
        format!(
            "You are a plant pathologist. A grower describes their plant's \
             symptoms as: {description}. Diagnose the most likely disease \
             from this description. {format_clause}",
            description = request.description,
        )
    }
}

/// Whether the image reference is an http(s) URL the remote service could
/// actually fetch. Loopback and local paths are not.
fn is_fetchable_url(image_ref: &str) -> bool {
    let Ok(url) = Url::parse(image_ref) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match url.host_str() {
        Some(host) => host != "localhost" && host != "127.0.0.1" && host != "[::1]",
        None => false,
    }
}

fn parse_diagnosis(body: &[u8]) -> Result<Diagnosis, DiagnosisSourceError> {
    let decoded: GenerateContentResponse = serde_json::from_slice(body).map_err(|error| {
        DiagnosisSourceError::decode(format!("invalid diagnosis JSON payload: {error}"))
    })?;
    let text = decoded
        .first_text()
        .ok_or_else(|| DiagnosisSourceError::decode("reply contains no generated text"))?;
    Ok(text_to_diagnosis(&text))
}

/// Decode generated text into the structured shape, falling back to free
/// text when the model ignored the format instruction.
fn text_to_diagnosis(text: &str) -> Diagnosis {
    let stripped = strip_code_fences(text);
    match serde_json::from_str::<StructuredDiagnosisDto>(stripped) {
        Ok(dto) => Diagnosis::Structured {
            disease_name: dto.disease_name,
            cause: dto.cause,
            explanation: dto.explanation,
            remedy: dto.remedy,
        },
        Err(_) => Diagnosis::FreeText {
            details: text.trim().to_owned(),
        },
    }
}

/// Models often wrap JSON replies in Markdown code fences.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn map_transport_error(error: reqwest::Error) -> DiagnosisSourceError {
    if error.is_timeout() {
        DiagnosisSourceError::timeout(error.to_string())
    } else {
        DiagnosisSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DiagnosisSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DiagnosisSourceError::timeout(message)
        }
        _ => DiagnosisSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network diagnosis mapping helpers.

    use super::*;
    use rstest::rstest;

    fn request(image_ref: &str) -> DiagnosisRequest {
        DiagnosisRequest {
            image_ref: image_ref.to_owned(),
            description: "yellowing leaves with brown edges".to_owned(),
            language: "Hindi".to_owned(),
        }
    }

    #[test]
    fn public_image_urls_produce_an_image_prompt() {
        let prompt = build_prompt(&request("https://cdn.example.com/uploads/1679.jpg"));
        assert!(prompt.contains("image at https://cdn.example.com/uploads/1679.jpg"));
        assert!(prompt.contains("Respond in Hindi"));
    }

    #[rstest]
    #[case("/uploads/1679509123456.jpg")]
    #[case("http://localhost:3000/uploads/1679.jpg")]
    #[case("http://127.0.0.1/uploads/1679.jpg")]
    #[case("ftp://example.com/leaf.jpg")]
    fn unreachable_image_refs_fall_back_to_description_only(#[case] image_ref: &str) {
        let prompt = build_prompt(&request(image_ref));
        assert!(!prompt.contains("image at"));
        assert!(prompt.contains("yellowing leaves with brown edges"));
    }

    #[test]
    fn structured_reply_decodes_into_the_canonical_shape() {
        let body = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [
                            {
                                "text": "{\"diseaseName\":\"leaf spot\",\"cause\":\"fungus\",\"explanation\":\"humid spread\",\"remedy\":\"neem oil\"}"
                            }
                        ]
                    }
                }
            ]
        }"#;

        let diagnosis = parse_diagnosis(body.as_bytes()).expect("reply should decode");
        assert_eq!(
            diagnosis,
            Diagnosis::Structured {
                disease_name: "leaf spot".into(),
                cause: "fungus".into(),
                explanation: "humid spread".into(),
                remedy: "neem oil".into(),
            }
        );
    }

    #[test]
    fn fenced_json_replies_are_unwrapped() {
        let text = "```json\n{\"diseaseName\":\"rust\",\"cause\":\"fungus\",\"explanation\":\"orange pustules\",\"remedy\":\"sulfur spray\"}\n```";
        assert!(matches!(
            text_to_diagnosis(text),
            Diagnosis::Structured { .. }
        ));
    }

    #[test]
    fn prose_replies_fall_back_to_free_text() {
        let diagnosis = text_to_diagnosis("This looks like sunburn. Move the plant.");
        assert_eq!(
            diagnosis,
            Diagnosis::FreeText {
                details: "This looks like sunburn. Move the plant.".into()
            }
        );
    }

    #[test]
    fn replies_without_candidates_are_decode_errors() {
        let error =
            parse_diagnosis(br#"{"candidates":[]}"#).expect_err("empty reply must fail");
        assert!(matches!(error, DiagnosisSourceError::Decode { .. }));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::too_many_requests(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn maps_http_statuses_to_expected_errors(
        #[case] status: StatusCode,
        #[case] is_timeout: bool,
    ) {
        let error = map_status_error(status, b"{\"error\":\"overloaded\"}");
        if is_timeout {
            assert!(matches!(error, DiagnosisSourceError::Timeout { .. }));
        } else {
            assert!(matches!(error, DiagnosisSourceError::Transport { .. }));
        }
    }

    #[test]
    fn status_messages_include_a_bounded_body_preview() {
        let long_body = "x".repeat(500);
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, long_body.as_bytes());
        let message = error.to_string();
        assert!(message.contains("status 500"));
        assert!(message.len() < 300);
    }
}
