//! Product listing data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Database identifier of a listing. Serial ids double as the recency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ListingId(i32);

impl ListingId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upper bounds applied to new listings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingLimits {
    pub max_price: f64,
    pub max_quantity: f64,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self {
            max_price: 20_000.0,
            max_quantity: 2_000.0,
        }
    }
}

/// Listing fields as submitted by the seller, before bounds validation.
///
/// `currency` and `quantity_unit` are free-form tags ("₹", "kilogram"); only
/// their presence is checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub product_name: String,
    pub price: f64,
    pub quantity: f64,
    pub quality: String,
    pub description: String,
    pub contact_number: String,
    pub image_path: Option<String>,
    pub currency: String,
    pub quantity_unit: String,
}

/// Validated listing fields handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub product_name: String,
    pub price: f64,
    pub quantity: f64,
    pub quality: String,
    pub description: String,
    pub contact_number: String,
    pub image_path: Option<String>,
    pub currency: String,
    pub quantity_unit: String,
}

/// A stored product-for-sale record.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: ListingId,
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
