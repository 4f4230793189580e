//! Port abstraction for prediction persistence adapters.

use async_trait::async_trait;

use crate::domain::prediction::{Diagnosis, NewPrediction, PredictionId, PredictionRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by prediction repository adapters.
    pub enum PredictionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "prediction repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "prediction repository query failed: {message}",
        /// No record exists for the requested id.
        Missing => "prediction record does not exist",
    }
}

/// Persistence port for uploaded-image prediction records.
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    /// Insert a new record with no diagnosis yet, returning its id.
    async fn insert(
        &self,
        prediction: &NewPrediction,
    ) -> Result<PredictionId, PredictionPersistenceError>;

    /// Fetch a record by id.
    async fn find_by_id(
        &self,
        id: PredictionId,
    ) -> Result<Option<PredictionRecord>, PredictionPersistenceError>;

    /// Overwrite the diagnosis column for the record. Idempotent.
    async fn attach_diagnosis(
        &self,
        id: PredictionId,
        diagnosis: &Diagnosis,
    ) -> Result<(), PredictionPersistenceError>;
}
