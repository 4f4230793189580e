//! OpenAPI documentation configuration.
//!
//! The generated document covers the account, listing, prediction, and
//! health endpoints. In debug builds it is served at
//! `/api-docs/openapi.json` for external tooling.

use utoipa::OpenApi;

use crate::domain::account::Role;
use crate::domain::prediction::Diagnosis;
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::listings::ListingResponse;
use crate::inbound::http::predictions::{PredictionCreatedResponse, PredictionRecordResponse};

/// OpenAPI document for the marketplace API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agrimarket backend API",
        description = "Farmer and customer marketplace: accounts, product \
                       listings, and plant disease predictions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::listings::create_listing,
        crate::inbound::http::listings::list_listings,
        crate::inbound::http::predictions::create_prediction,
        crate::inbound::http::predictions::analyze_prediction,
        crate::inbound::http::predictions::get_prediction,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        Role,
        Diagnosis,
        RegisterRequest,
        LoginRequest,
        ListingResponse,
        PredictionCreatedResponse,
        PredictionRecordResponse,
    )),
    tags(
        (name = "accounts", description = "Registration and login for both roles"),
        (name = "listings", description = "Product listings for the market pages"),
        (name = "predictions", description = "Image uploads and disease diagnosis"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
