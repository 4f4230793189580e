//! Listing endpoints: multipart creation from the selling form and a JSON
//! feed consumed by the market pages.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, get, http::header, post, web};
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::listing::{Listing, ListingDraft};
use crate::domain::ports::{ImageStoreError, ListingPersistenceError};
use crate::domain::{DomainError, ListingError};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Multipart body posted by the selling form. Field names mirror the form
/// inputs on the page.
#[derive(MultipartForm)]
pub struct ListingForm {
    #[multipart(rename = "productName")]
    pub product_name: Text<String>,
    pub price: Text<f64>,
    pub quantity: Text<f64>,
    #[multipart(rename = "productQuality")]
    pub quality: Text<String>,
    #[multipart(rename = "productDescription")]
    pub description: Text<String>,
    #[multipart(rename = "contactNumber")]
    pub contact_number: Text<String>,
    pub currency: Text<String>,
    #[multipart(rename = "quantityUnit")]
    pub quantity_unit: Text<String>,
    #[multipart(rename = "productImage", limit = "10MiB")]
    pub image: Option<TempFile>,
}

/// Listing as rendered to the market pages.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: i32,
    pub product_name: String,
    pub price: f64,
    pub quantity: f64,
    pub quality: String,
    pub description: String,
    pub contact_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub currency: String,
    pub quantity_unit: String,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.value(),
            product_name: listing.product_name,
            price: listing.price,
            quantity: listing.quantity,
            quality: listing.quality,
            description: listing.description,
            contact_number: listing.contact_number,
            image_path: listing.image_path,
            currency: listing.currency,
            quantity_unit: listing.quantity_unit,
        }
    }
}

/// Persist a listing from the selling form and send the browser to the
/// market page.
#[utoipa::path(
    post,
    path = "/listings",
    responses(
        (status = 303, description = "Listing created, redirect to the market page"),
        (status = 400, description = "A field failed validation or exceeded a bound", body = ApiError)
    ),
    tags = ["listings"],
    operation_id = "createListing"
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<ListingForm>,
) -> ApiResult<HttpResponse> {
    let image_path = match form.image {
        Some(image) => Some(store_image(&state, image).await?),
        None => None,
    };

    let draft = ListingDraft {
        product_name: form.product_name.into_inner(),
        price: form.price.into_inner(),
        quantity: form.quantity.into_inner(),
        quality: form.quality.into_inner(),
        description: form.description.into_inner(),
        contact_number: form.contact_number.into_inner(),
        image_path,
        currency: form.currency.into_inner(),
        quantity_unit: form.quantity_unit.into_inner(),
    };
    state
        .listings
        .create_listing(draft)
        .await
        .map_err(map_listing_error)?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/market"))
        .finish())
}

/// All listings, newest first.
#[utoipa::path(
    get,
    path = "/listings",
    responses(
        (status = 200, description = "Every listing, newest first", body = [ListingResponse])
    ),
    tags = ["listings"],
    operation_id = "listListings"
)]
#[get("/listings")]
pub async fn list_listings(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<ListingResponse>>> {
    let listings = state
        .listings
        .list_listings()
        .await
        .map_err(map_listing_error)?;
    Ok(web::Json(
        listings.into_iter().map(ListingResponse::from).collect(),
    ))
}

async fn store_image(state: &HttpState, image: TempFile) -> Result<String, ApiError> {
    let original_name = image.file_name.as_deref().unwrap_or("upload").to_owned();
    let bytes = tokio::fs::read(image.file.path()).await.map_err(|err| {
        warn!(error = %err, "failed to read uploaded listing image");
        ApiError::from(DomainError::internal("could not read the uploaded image"))
    })?;
    let stored = state
        .images
        .store(&original_name, &bytes)
        .await
        .map_err(|ImageStoreError::Io { message }| {
            warn!(error = message, "failed to persist uploaded listing image");
            ApiError::from(DomainError::internal("could not store the uploaded image"))
        })?;
    Ok(stored.public_path)
}

fn map_listing_error(error: ListingError) -> ApiError {
    match error {
        ListingError::MissingField { field } => DomainError::invalid_request(error.to_string())
            .with_details(json!({ "field": field }))
            .into(),
        ListingError::InvalidPrice | ListingError::InvalidQuantity => {
            DomainError::invalid_request(error.to_string()).into()
        }
        ListingError::PriceExceeded { max } => DomainError::invalid_request(error.to_string())
            .with_details(json!({ "field": "price", "max": max }))
            .into(),
        ListingError::QuantityExceeded { max } => DomainError::invalid_request(error.to_string())
            .with_details(json!({ "field": "quantity", "max": max }))
            .into(),
        ListingError::Storage(storage) => {
            warn!(error = %storage, "listing storage failed");
            match storage {
                ListingPersistenceError::Connection { .. } => {
                    DomainError::service_unavailable("listing storage is unavailable").into()
                }
                ListingPersistenceError::Query { .. } => {
                    DomainError::internal("listing storage failed").into()
                }
            }
        }
    }
}
