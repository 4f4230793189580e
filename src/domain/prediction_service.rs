//! Prediction store use-cases and the analyze orchestration.
//!
//! `analyze` is the only operation that touches the external diagnosis
//! service: load the record, make one outbound call, persist the result.
//! When the upstream call fails nothing is written and the record stays in
//! its created state.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{
    DiagnosisRequest, DiagnosisSource, DiagnosisSourceError, PredictionPersistenceError,
    PredictionRepository,
};
use crate::domain::prediction::{Diagnosis, NewPrediction, PredictionId, PredictionRecord};

/// Failures raised by the prediction store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    #[error("prediction not found")]
    NotFound,
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error(transparent)]
    Storage(PredictionPersistenceError),
}

/// Failures raised by [`PredictionService::analyze`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("prediction not found")]
    NotFound,
    #[error(transparent)]
    Upstream(#[from] DiagnosisSourceError),
    #[error(transparent)]
    Storage(PredictionPersistenceError),
}

/// Prediction store plus the diagnosis workflow over it.
#[derive(Clone)]
pub struct PredictionService {
    predictions: Arc<dyn PredictionRepository>,
    diagnosis: Arc<dyn DiagnosisSource>,
}

impl PredictionService {
    pub fn new(
        predictions: Arc<dyn PredictionRepository>,
        diagnosis: Arc<dyn DiagnosisSource>,
    ) -> Self {
        Self {
            predictions,
            diagnosis,
        }
    }

    /// Persist a new record with no diagnosis yet.
    pub async fn create_prediction(
        &self,
        prediction: NewPrediction,
    ) -> Result<PredictionId, PredictionError> {
        if prediction.image_path.trim().is_empty() {
            return Err(PredictionError::MissingField { field: "image" });
        }
        if prediction.language.trim().is_empty() {
            return Err(PredictionError::MissingField { field: "language" });
        }

        let id = self
            .predictions
            .insert(&prediction)
            .await
            .map_err(map_storage_error)?;
        info!(prediction = %id, "prediction record created");
        Ok(id)
    }

    /// Fetch a record by id.
    pub async fn get_prediction(
        &self,
        id: PredictionId,
    ) -> Result<PredictionRecord, PredictionError> {
        self.predictions
            .find_by_id(id)
            .await
            .map_err(map_storage_error)?
            .ok_or(PredictionError::NotFound)
    }

    /// Overwrite the stored diagnosis. Idempotent; no versioning.
    pub async fn attach_diagnosis(
        &self,
        id: PredictionId,
        diagnosis: &Diagnosis,
    ) -> Result<(), PredictionError> {
        self.predictions
            .attach_diagnosis(id, diagnosis)
            .await
            .map_err(map_storage_error)
    }

    /// Run the diagnosis workflow for a stored record.
    ///
    /// Re-invoking on an already-diagnosed record is allowed and overwrites
    /// the previous result.
    pub async fn analyze(&self, id: PredictionId) -> Result<Diagnosis, AnalysisError> {
        let record = self
            .predictions
            .find_by_id(id)
            .await
            .map_err(map_analysis_storage_error)?
            .ok_or(AnalysisError::NotFound)?;

        let request = DiagnosisRequest {
            image_ref: record.image_path.clone(),
            description: record.description.clone(),
            language: record.language.clone(),
        };
        let diagnosis = self.diagnosis.diagnose(&request).await?;

        self.predictions
            .attach_diagnosis(id, &diagnosis)
            .await
            .map_err(map_analysis_storage_error)?;
        info!(prediction = %id, "diagnosis attached");
        Ok(diagnosis)
    }
}

fn map_storage_error(error: PredictionPersistenceError) -> PredictionError {
    match error {
        PredictionPersistenceError::Missing => PredictionError::NotFound,
        other => PredictionError::Storage(other),
    }
}

fn map_analysis_storage_error(error: PredictionPersistenceError) -> AnalysisError {
    match error {
        PredictionPersistenceError::Missing => AnalysisError::NotFound,
        other => AnalysisError::Storage(other),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the prediction workflow.
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct StubPredictionRepository {
        rows: Mutex<HashMap<i32, PredictionRecord>>,
        attach_calls: AtomicUsize,
    }

    impl StubPredictionRepository {
        fn record(&self, id: PredictionId) -> Option<PredictionRecord> {
            self.rows.lock().expect("rows lock").get(&id.value()).cloned()
        }
    }

    #[async_trait]
    impl PredictionRepository for StubPredictionRepository {
        async fn insert(
            &self,
            prediction: &NewPrediction,
        ) -> Result<PredictionId, PredictionPersistenceError> {
            let mut rows = self.rows.lock().expect("rows lock");
            let id = PredictionId::new(
                i32::try_from(rows.len()).expect("small test table") + 1,
            );
            rows.insert(
                id.value(),
                PredictionRecord {
                    id,
                    image_path: prediction.image_path.clone(),
                    description: prediction.description.clone(),
                    language: prediction.language.clone(),
                    diagnosis: None,
                    created_at: chrono::Utc::now(),
                },
            );
            Ok(id)
        }

        async fn find_by_id(
            &self,
            id: PredictionId,
        ) -> Result<Option<PredictionRecord>, PredictionPersistenceError> {
            Ok(self.record(id))
        }

        async fn attach_diagnosis(
            &self,
            id: PredictionId,
            diagnosis: &Diagnosis,
        ) -> Result<(), PredictionPersistenceError> {
            self.attach_calls.fetch_add(1, Ordering::Relaxed);
            let mut rows = self.rows.lock().expect("rows lock");
            let record = rows
                .get_mut(&id.value())
                .ok_or(PredictionPersistenceError::Missing)?;
            record.diagnosis = Some(diagnosis.clone());
            Ok(())
        }
    }

    struct StubDiagnosisSource {
        reply: Result<Diagnosis, DiagnosisSourceError>,
    }

    #[async_trait]
    impl DiagnosisSource for StubDiagnosisSource {
        async fn diagnose(
            &self,
            _request: &DiagnosisRequest,
        ) -> Result<Diagnosis, DiagnosisSourceError> {
            self.reply.clone()
        }
    }

    fn sample_diagnosis() -> Diagnosis {
        Diagnosis::Structured {
            disease_name: "leaf spot".into(),
            cause: "fungus".into(),
            explanation: "humid conditions spread spores".into(),
            remedy: "neem oil spray".into(),
        }
    }

    fn new_prediction() -> NewPrediction {
        NewPrediction {
            image_path: "/uploads/1679509123456.jpg".into(),
            description: "black spots on leaves".into(),
            language: "English".into(),
        }
    }

    fn service(
        reply: Result<Diagnosis, DiagnosisSourceError>,
    ) -> (Arc<StubPredictionRepository>, PredictionService) {
        let repository = Arc::new(StubPredictionRepository::default());
        let service = PredictionService::new(
            repository.clone(),
            Arc::new(StubDiagnosisSource { reply }),
        );
        (repository, service)
    }

    #[tokio::test]
    async fn records_start_without_a_diagnosis() {
        let (_, service) = service(Ok(sample_diagnosis()));
        let id = service
            .create_prediction(new_prediction())
            .await
            .expect("creation succeeds");

        let record = service.get_prediction(id).await.expect("record exists");
        assert!(!record.is_diagnosed());
        assert_eq!(record.description, "black spots on leaves");
    }

    #[tokio::test]
    async fn analyze_attaches_and_returns_the_diagnosis() {
        let (_, service) = service(Ok(sample_diagnosis()));
        let id = service
            .create_prediction(new_prediction())
            .await
            .expect("creation succeeds");

        let diagnosis = service.analyze(id).await.expect("analysis succeeds");
        assert_eq!(diagnosis, sample_diagnosis());

        let record = service.get_prediction(id).await.expect("record exists");
        assert_eq!(record.diagnosis, Some(sample_diagnosis()));
    }

    #[tokio::test]
    async fn upstream_timeout_leaves_the_record_untouched() {
        let (repository, service) =
            service(Err(DiagnosisSourceError::timeout("deadline exceeded")));
        let id = service
            .create_prediction(new_prediction())
            .await
            .expect("creation succeeds");

        let err = service.analyze(id).await.expect_err("analysis must fail");
        assert!(matches!(
            err,
            AnalysisError::Upstream(DiagnosisSourceError::Timeout { .. })
        ));
        assert_eq!(repository.attach_calls.load(Ordering::Relaxed), 0);
        let record = service.get_prediction(id).await.expect("record exists");
        assert!(!record.is_diagnosed());
    }

    #[tokio::test]
    async fn analyzing_an_unknown_id_is_not_found() {
        let (_, service) = service(Ok(sample_diagnosis()));
        let err = service
            .analyze(PredictionId::new(99))
            .await
            .expect_err("unknown id must fail");
        assert_eq!(err, AnalysisError::NotFound);
    }

    #[tokio::test]
    async fn reanalysis_overwrites_the_stored_diagnosis() {
        let (repository, service) = service(Ok(sample_diagnosis()));
        let id = service
            .create_prediction(new_prediction())
            .await
            .expect("creation succeeds");

        service.analyze(id).await.expect("first analysis succeeds");
        let replacement = Diagnosis::FreeText {
            details: "general advice".into(),
        };
        service
            .attach_diagnosis(id, &replacement)
            .await
            .expect("overwrite succeeds");

        let record = service.get_prediction(id).await.expect("record exists");
        assert_eq!(record.diagnosis, Some(replacement));
        assert_eq!(repository.attach_calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn blank_language_is_rejected_at_creation() {
        let (_, service) = service(Ok(sample_diagnosis()));
        let err = service
            .create_prediction(NewPrediction {
                language: "  ".into(),
                ..new_prediction()
            })
            .await
            .expect_err("blank language must fail");
        assert_eq!(err, PredictionError::MissingField { field: "language" });
    }
}
