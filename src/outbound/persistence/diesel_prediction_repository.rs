//! PostgreSQL-backed `PredictionRepository` implementation using Diesel.
//!
//! The diagnosis is stored as a JSONB column so the structured and
//! free-text shapes share one representation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PredictionPersistenceError, PredictionRepository};
use crate::domain::prediction::{Diagnosis, NewPrediction, PredictionId, PredictionRecord};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPredictionRow, PredictionRow};
use super::pool::{DbPool, PoolError};
use super::schema::predictions;

/// Diesel-backed implementation of the prediction repository port.
#[derive(Clone)]
pub struct DieselPredictionRepository {
    pool: DbPool,
}

impl DieselPredictionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_prediction_pool_error(error: PoolError) -> PredictionPersistenceError {
    map_pool_error(error, PredictionPersistenceError::connection)
}

fn map_prediction_diesel_error(error: DieselError) -> PredictionPersistenceError {
    map_diesel_error(
        error,
        PredictionPersistenceError::query,
        PredictionPersistenceError::connection,
    )
}

fn row_to_record(row: PredictionRow) -> Result<PredictionRecord, PredictionPersistenceError> {
    let diagnosis = row
        .diagnosis
        .map(serde_json::from_value::<Diagnosis>)
        .transpose()
        .map_err(|err| {
            PredictionPersistenceError::query(format!("decode diagnosis: {err}"))
        })?;

    Ok(PredictionRecord {
        id: PredictionId::new(row.id),
        image_path: row.image_path,
        description: row.description,
        language: row.language,
        diagnosis,
        created_at: row.created_at,
    })
}

#[async_trait]
impl PredictionRepository for DieselPredictionRepository {
    async fn insert(
        &self,
        prediction: &NewPrediction,
    ) -> Result<PredictionId, PredictionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_prediction_pool_error)?;

        let new_row = NewPredictionRow {
            image_path: &prediction.image_path,
            description: &prediction.description,
            language: &prediction.language,
        };

        let id = diesel::insert_into(predictions::table)
            .values(&new_row)
            .returning(predictions::id)
            .get_result::<i32>(&mut conn)
            .await
            .map_err(map_prediction_diesel_error)?;

        Ok(PredictionId::new(id))
    }

    async fn find_by_id(
        &self,
        id: PredictionId,
    ) -> Result<Option<PredictionRecord>, PredictionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_prediction_pool_error)?;

        let row = predictions::table
            .find(id.value())
            .select(PredictionRow::as_select())
            .first::<PredictionRow>(&mut conn)
            .await;

        match row {
            Ok(row) => Ok(Some(row_to_record(row)?)),
            Err(DieselError::NotFound) => Ok(None),
            Err(err) => Err(map_prediction_diesel_error(err)),
        }
    }

    async fn attach_diagnosis(
        &self,
        id: PredictionId,
        diagnosis: &Diagnosis,
    ) -> Result<(), PredictionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_prediction_pool_error)?;

        let value = serde_json::to_value(diagnosis).map_err(|err| {
            PredictionPersistenceError::query(format!("encode diagnosis: {err}"))
        })?;

        let updated = diesel::update(predictions::table.find(id.value()))
            .set(predictions::diagnosis.eq(Some(value)))
            .execute(&mut conn)
            .await
            .map_err(map_prediction_diesel_error)?;

        if updated == 0 {
            return Err(PredictionPersistenceError::missing());
        }
        Ok(())
    }
}
