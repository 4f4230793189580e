//! PostgreSQL-backed `ListingRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::listing::{Listing, ListingId, NewListing};
use crate::domain::ports::{ListingPersistenceError, ListingRepository};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ListingRow, NewListingRow};
use super::pool::{DbPool, PoolError};
use super::schema::listings;

/// Diesel-backed implementation of the listing repository port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_listing_pool_error(error: PoolError) -> ListingPersistenceError {
    map_pool_error(error, ListingPersistenceError::connection)
}

fn map_listing_diesel_error(error: diesel::result::Error) -> ListingPersistenceError {
    map_diesel_error(
        error,
        ListingPersistenceError::query,
        ListingPersistenceError::connection,
    )
}

fn row_to_listing(row: ListingRow) -> Listing {
    Listing {
        id: ListingId::new(row.id),
        product_name: row.product_name,
        price: row.price,
        quantity: row.quantity,
        quality: row.quality,
        description: row.description,
        contact_number: row.contact_number,
        image_path: row.image_path,
        currency: row.currency,
        quantity_unit: row.quantity_unit,
        created_at: row.created_at,
    }
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &NewListing) -> Result<ListingId, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_listing_pool_error)?;

        let new_row = NewListingRow {
            product_name: &listing.product_name,
            price: listing.price,
            quantity: listing.quantity,
            quality: &listing.quality,
            description: &listing.description,
            contact_number: &listing.contact_number,
            image_path: listing.image_path.as_deref(),
            currency: &listing.currency,
            quantity_unit: &listing.quantity_unit,
        };

        let id = diesel::insert_into(listings::table)
            .values(&new_row)
            .returning(listings::id)
            .get_result::<i32>(&mut conn)
            .await
            .map_err(map_listing_diesel_error)?;

        Ok(ListingId::new(id))
    }

    async fn list_newest_first(&self) -> Result<Vec<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_listing_pool_error)?;

        let rows = listings::table
            .select(ListingRow::as_select())
            .order(listings::id.desc())
            .load::<ListingRow>(&mut conn)
            .await
            .map_err(map_listing_diesel_error)?;

        Ok(rows.into_iter().map(row_to_listing).collect())
    }
}
