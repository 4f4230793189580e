//! Prediction endpoints: image upload, diagnosis workflow, record fetch.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{get, post, web};
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::{DiagnosisSourceError, ImageStoreError, PredictionPersistenceError};
use crate::domain::prediction::{Diagnosis, NewPrediction, PredictionId, PredictionRecord};
use crate::domain::{AnalysisError, DomainError, PredictionError};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Multipart body posted by the symptom upload form.
#[derive(MultipartForm)]
pub struct PredictionUploadForm {
    pub description: Text<String>,
    pub language: Text<String>,
    #[multipart(rename = "imageInput", limit = "10MiB")]
    pub image: TempFile,
}

/// Body returned by `POST /predictions`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionCreatedResponse {
    pub success: bool,
    pub prediction_id: i32,
}

/// Envelope wrapping a diagnosis or a stored record.
#[derive(Debug, Serialize)]
pub struct PredictionDataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

/// Stored record as rendered to the result page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecordResponse {
    pub id: i32,
    pub image_path: String,
    pub description: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Diagnosis>,
}

impl From<PredictionRecord> for PredictionRecordResponse {
    fn from(record: PredictionRecord) -> Self {
        Self {
            id: record.id.value(),
            image_path: record.image_path,
            description: record.description,
            language: record.language,
            diagnosis: record.diagnosis,
        }
    }
}

/// Store the uploaded image and create a prediction record for it.
#[utoipa::path(
    post,
    path = "/predictions",
    responses(
        (status = 200, description = "Record created", body = PredictionCreatedResponse),
        (status = 400, description = "Image or language missing", body = ApiError)
    ),
    tags = ["predictions"],
    operation_id = "createPrediction"
)]
#[post("/predictions")]
pub async fn create_prediction(
    state: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<PredictionUploadForm>,
) -> ApiResult<web::Json<PredictionCreatedResponse>> {
    let original_name = form.image.file_name.as_deref().unwrap_or("upload").to_owned();
    let bytes = tokio::fs::read(form.image.file.path()).await.map_err(|err| {
        warn!(error = %err, "failed to read uploaded symptom image");
        ApiError::from(DomainError::internal("could not read the uploaded image"))
    })?;
    let stored = state
        .images
        .store(&original_name, &bytes)
        .await
        .map_err(|ImageStoreError::Io { message }| {
            warn!(error = message, "failed to persist uploaded symptom image");
            ApiError::from(DomainError::internal("could not store the uploaded image"))
        })?;

    let id = state
        .predictions
        .create_prediction(NewPrediction {
            image_path: stored.public_path,
            description: form.description.into_inner(),
            language: form.language.into_inner(),
        })
        .await
        .map_err(map_prediction_error)?;

    Ok(web::Json(PredictionCreatedResponse {
        success: true,
        prediction_id: id.value(),
    }))
}

/// Run the diagnosis workflow for a stored record and return the result.
#[utoipa::path(
    post,
    path = "/predictions/{id}/analyze",
    params(("id" = i32, Path, description = "Prediction record id")),
    responses(
        (status = 200, description = "Diagnosis attached and returned"),
        (status = 404, description = "No record with this id", body = ApiError),
        (status = 502, description = "Diagnosis service failed", body = ApiError)
    ),
    tags = ["predictions"],
    operation_id = "analyzePrediction"
)]
#[post("/predictions/{id}/analyze")]
pub async fn analyze_prediction(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<PredictionDataResponse<Diagnosis>>> {
    let diagnosis = state
        .predictions
        .analyze(PredictionId::new(id.into_inner()))
        .await
        .map_err(map_analysis_error)?;
    Ok(web::Json(PredictionDataResponse {
        success: true,
        data: diagnosis,
    }))
}

/// Fetch a stored record, diagnosed or not.
#[utoipa::path(
    get,
    path = "/predictions/{id}",
    params(("id" = i32, Path, description = "Prediction record id")),
    responses(
        (status = 200, description = "Stored record"),
        (status = 404, description = "No record with this id", body = ApiError)
    ),
    tags = ["predictions"],
    operation_id = "getPrediction"
)]
#[get("/predictions/{id}")]
pub async fn get_prediction(
    state: web::Data<HttpState>,
    id: web::Path<i32>,
) -> ApiResult<web::Json<PredictionDataResponse<PredictionRecordResponse>>> {
    let record = state
        .predictions
        .get_prediction(PredictionId::new(id.into_inner()))
        .await
        .map_err(map_prediction_error)?;
    Ok(web::Json(PredictionDataResponse {
        success: true,
        data: record.into(),
    }))
}

fn map_prediction_error(error: PredictionError) -> ApiError {
    match error {
        PredictionError::NotFound => DomainError::not_found("prediction not found").into(),
        PredictionError::MissingField { field } => {
            DomainError::invalid_request(error.to_string())
                .with_details(json!({ "field": field }))
                .into()
        }
        PredictionError::Storage(storage) => storage_error(storage),
    }
}

fn map_analysis_error(error: AnalysisError) -> ApiError {
    match error {
        AnalysisError::NotFound => DomainError::not_found("prediction not found").into(),
        AnalysisError::Upstream(upstream) => {
            warn!(error = %upstream, "diagnosis service call failed");
            match upstream {
                DiagnosisSourceError::Timeout { .. }
                | DiagnosisSourceError::Transport { .. } => {
                    DomainError::bad_gateway("diagnosis service is unavailable").into()
                }
                DiagnosisSourceError::Decode { .. } => DomainError::bad_gateway(
                    "diagnosis service returned an unexpected reply",
                )
                .into(),
            }
        }
        AnalysisError::Storage(storage) => storage_error(storage),
    }
}

fn storage_error(error: PredictionPersistenceError) -> ApiError {
    warn!(error = %error, "prediction storage failed");
    match error {
        PredictionPersistenceError::Connection { .. } => {
            DomainError::service_unavailable("prediction storage is unavailable").into()
        }
        PredictionPersistenceError::Missing => {
            DomainError::not_found("prediction not found").into()
        }
        PredictionPersistenceError::Query { .. } => {
            DomainError::internal("prediction storage failed").into()
        }
    }
}

#[cfg(test)]
mod tests {
    //! Handler coverage for the upload-analyze-fetch flow.
    use actix_web::{App, http::StatusCode, http::header, test};
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::{
        CannedDiagnosisSource, test_state, test_state_with_diagnosis,
    };

    const BOUNDARY: &str = "prediction-test-boundary";

    fn upload_body() -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in [
            ("description", "black spots on leaves"),
            ("language", "English"),
        ] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"imageInput\"; filename=\"leaf.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nnot-really-a-jpeg\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn upload(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::dev::ServiceResponse {
        test::call_service(
            app,
            test::TestRequest::post()
                .uri("/predictions")
                .insert_header((
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                ))
                .set_payload(upload_body())
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn upload_creates_a_record_with_a_public_image_path() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(create_prediction)
                .service(get_prediction),
        )
        .await;

        let res = upload(&app).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        let id = body["predictionId"].as_i64().expect("prediction id");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/predictions/{id}"))
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["imagePath"], "/uploads/leaf.jpg");
        assert_eq!(body["data"]["language"], "English");
        assert!(body["data"].get("diagnosis").is_none());
    }

    #[actix_web::test]
    async fn analyze_returns_the_structured_diagnosis() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(create_prediction)
                .service(analyze_prediction),
        )
        .await;

        let res = upload(&app).await;
        let body: Value = test::read_body_json(res).await;
        let id = body["predictionId"].as_i64().expect("prediction id");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/predictions/{id}/analyze"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["diseaseName"], "leaf spot");
        assert_eq!(body["data"]["remedy"], "neem oil spray");
    }

    #[actix_web::test]
    async fn upstream_timeout_maps_to_bad_gateway() {
        let state = test_state_with_diagnosis(CannedDiagnosisSource {
            reply: Err(crate::domain::ports::DiagnosisSourceError::timeout(
                "deadline exceeded",
            )),
        });
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(create_prediction)
                .service(analyze_prediction),
        )
        .await;

        let res = upload(&app).await;
        let body: Value = test::read_body_json(res).await;
        let id = body["predictionId"].as_i64().expect("prediction id");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/predictions/{id}/analyze"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "bad_gateway");
    }

    #[actix_web::test]
    async fn unknown_record_is_not_found() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(get_prediction)
                .service(analyze_prediction),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/predictions/99").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/predictions/99/analyze")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
