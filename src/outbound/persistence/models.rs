//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer, never exposed to the
//! domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{listings, predictions};

/// Row struct for reading from the listings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: i32,
    pub product_name: String,
    pub price: f64,
    pub quantity: f64,
    pub quality: String,
    pub description: String,
    pub contact_number: String,
    pub image_path: Option<String>,
    pub currency: String,
    pub quantity_unit: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating listing records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub(crate) struct NewListingRow<'a> {
    pub product_name: &'a str,
    pub price: f64,
    pub quantity: f64,
    pub quality: &'a str,
    pub description: &'a str,
    pub contact_number: &'a str,
    pub image_path: Option<&'a str>,
    pub currency: &'a str,
    pub quantity_unit: &'a str,
}

/// Row struct for reading from the predictions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = predictions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PredictionRow {
    pub id: i32,
    pub image_path: String,
    pub description: String,
    pub language: String,
    pub diagnosis: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating prediction records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = predictions)]
pub(crate) struct NewPredictionRow<'a> {
    pub image_path: &'a str,
    pub description: &'a str,
    pub language: &'a str,
}
