//! Listing store use-cases: bounded creation and newest-first reads.

use std::sync::Arc;

use tracing::info;

use crate::domain::listing::{Listing, ListingDraft, ListingId, ListingLimits, NewListing};
use crate::domain::ports::{ListingPersistenceError, ListingRepository};

/// Failures raised by [`ListingService::create_listing`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListingError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("price must be a non-negative number")]
    InvalidPrice,
    #[error("quantity must be a non-negative number")]
    InvalidQuantity,
    #[error("price exceeds the maximum of {max} per listing")]
    PriceExceeded { max: f64 },
    #[error("quantity exceeds the maximum of {max} per listing")]
    QuantityExceeded { max: f64 },
    #[error(transparent)]
    Storage(#[from] ListingPersistenceError),
}

/// Product listing store with configured price/quantity bounds.
#[derive(Clone)]
pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
    limits: ListingLimits,
}

impl ListingService {
    pub fn new(listings: Arc<dyn ListingRepository>, limits: ListingLimits) -> Self {
        Self { listings, limits }
    }

    /// Validate bounds and presence, then persist one listing row.
    pub async fn create_listing(&self, draft: ListingDraft) -> Result<ListingId, ListingError> {
        require_present("productName", &draft.product_name)?;
        require_present("productQuality", &draft.quality)?;
        require_present("productDescription", &draft.description)?;
        require_present("contactNumber", &draft.contact_number)?;
        require_present("currency", &draft.currency)?;
        require_present("quantityUnit", &draft.quantity_unit)?;

        if !draft.price.is_finite() || draft.price < 0.0 {
            return Err(ListingError::InvalidPrice);
        }
        if !draft.quantity.is_finite() || draft.quantity < 0.0 {
            return Err(ListingError::InvalidQuantity);
        }
        // Quantity is checked first to match the submission form's field order.
        if draft.quantity > self.limits.max_quantity {
            return Err(ListingError::QuantityExceeded {
                max: self.limits.max_quantity,
            });
        }
        if draft.price > self.limits.max_price {
            return Err(ListingError::PriceExceeded {
                max: self.limits.max_price,
            });
        }

        let listing = NewListing {
            product_name: draft.product_name,
            price: draft.price,
            quantity: draft.quantity,
            quality: draft.quality,
            description: draft.description,
            contact_number: draft.contact_number,
            image_path: draft.image_path,
            currency: draft.currency,
            quantity_unit: draft.quantity_unit,
        };
        let id = self.listings.insert(&listing).await?;
        info!(listing = %id, "listing created");
        Ok(id)
    }

    /// Return all listings, most recent first. Re-queried fresh each call.
    pub async fn list_listings(&self) -> Result<Vec<Listing>, ListingError> {
        Ok(self.listings.list_newest_first().await?)
    }
}

fn require_present(field: &'static str, value: &str) -> Result<(), ListingError> {
    if value.trim().is_empty() {
        return Err(ListingError::MissingField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for listing bounds and ordering.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;

    #[derive(Default)]
    struct StubListingRepository {
        rows: Mutex<Vec<Listing>>,
    }

    impl StubListingRepository {
        fn row_count(&self) -> usize {
            self.rows.lock().expect("rows lock").len()
        }
    }

    #[async_trait]
    impl ListingRepository for StubListingRepository {
        async fn insert(
            &self,
            listing: &NewListing,
        ) -> Result<ListingId, ListingPersistenceError> {
            let mut rows = self.rows.lock().expect("rows lock");
            let id = ListingId::new(i32::try_from(rows.len()).expect("small test table") + 1);
            rows.push(Listing {
                id,
                product_name: listing.product_name.clone(),
                price: listing.price,
                quantity: listing.quantity,
                quality: listing.quality.clone(),
                description: listing.description.clone(),
                contact_number: listing.contact_number.clone(),
                image_path: listing.image_path.clone(),
                currency: listing.currency.clone(),
                quantity_unit: listing.quantity_unit.clone(),
                created_at: chrono::Utc::now(),
            });
            Ok(id)
        }

        async fn list_newest_first(&self) -> Result<Vec<Listing>, ListingPersistenceError> {
            let mut rows = self.rows.lock().expect("rows lock").clone();
            rows.sort_by(|a, b| b.id.value().cmp(&a.id.value()));
            Ok(rows)
        }
    }

    fn draft() -> ListingDraft {
        ListingDraft {
            product_name: "Tomatoes".into(),
            price: 100.0,
            quantity: 10.0,
            quality: "Grade A".into(),
            description: "Fresh farm tomatoes".into(),
            contact_number: "9876543210".into(),
            image_path: None,
            currency: "₹".into(),
            quantity_unit: "kilogram".into(),
        }
    }

    fn service() -> (Arc<StubListingRepository>, ListingService) {
        let repository = Arc::new(StubListingRepository::default());
        let service = ListingService::new(repository.clone(), ListingLimits::default());
        (repository, service)
    }

    #[tokio::test]
    async fn excessive_price_fails_and_persists_nothing() {
        let (repository, service) = service();
        let err = service
            .create_listing(ListingDraft {
                price: 25_000.0,
                ..draft()
            })
            .await
            .expect_err("price above the bound must fail");

        assert_eq!(err, ListingError::PriceExceeded { max: 20_000.0 });
        assert_eq!(repository.row_count(), 0);
    }

    #[tokio::test]
    async fn excessive_quantity_fails_and_persists_nothing() {
        let (repository, service) = service();
        let err = service
            .create_listing(ListingDraft {
                quantity: 2_001.0,
                ..draft()
            })
            .await
            .expect_err("quantity above the bound must fail");

        assert_eq!(err, ListingError::QuantityExceeded { max: 2_000.0 });
        assert_eq!(repository.row_count(), 0);
    }

    #[tokio::test]
    async fn values_at_the_bound_are_accepted() {
        let (_, service) = service();
        service
            .create_listing(ListingDraft {
                price: 20_000.0,
                quantity: 2_000.0,
                ..draft()
            })
            .await
            .expect("values at the bound should pass");
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(-1.0)]
    #[tokio::test]
    async fn nonsense_prices_are_rejected(#[case] price: f64) {
        let (_, service) = service();
        let err = service
            .create_listing(ListingDraft { price, ..draft() })
            .await
            .expect_err("nonsense price must fail");
        assert_eq!(err, ListingError::InvalidPrice);
    }

    #[tokio::test]
    async fn blank_required_fields_are_rejected() {
        let (_, service) = service();
        let err = service
            .create_listing(ListingDraft {
                currency: "  ".into(),
                ..draft()
            })
            .await
            .expect_err("blank currency must fail");
        assert_eq!(err, ListingError::MissingField { field: "currency" });
    }

    #[tokio::test]
    async fn listings_come_back_newest_first() {
        let (_, service) = service();
        for name in ["first", "second", "third"] {
            service
                .create_listing(ListingDraft {
                    product_name: name.into(),
                    ..draft()
                })
                .await
                .expect("listing creation succeeds");
        }

        let listings = service.list_listings().await.expect("list succeeds");
        let names: Vec<&str> = listings
            .iter()
            .map(|listing| listing.product_name.as_str())
            .collect();
        assert_eq!(names, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn new_listing_appears_at_the_head() {
        let (_, service) = service();
        service
            .create_listing(draft())
            .await
            .expect("first listing succeeds");
        let id = service
            .create_listing(ListingDraft {
                product_name: "Onions".into(),
                ..draft()
            })
            .await
            .expect("second listing succeeds");

        let listings = service.list_listings().await.expect("list succeeds");
        assert_eq!(listings.first().map(|listing| listing.id), Some(id));
    }
}
