//! Registration and login endpoints, parameterised by account role.
//!
//! Both endpoints accept classic browser form posts and answer successful
//! submissions with a redirect to the role's landing page, so the static
//! pages can submit without any client-side scripting.

use actix_web::{HttpResponse, http::header, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::account::Role;
use crate::domain::ports::AccountPersistenceError;
use crate::domain::{AuthError, DomainError, RegistrationError};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Form body for `POST /accounts/{role}/register`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub phone: String,
    pub password: String,
}

/// Form body for `POST /accounts/{role}/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Create an account in the role's namespace and send the browser to the
/// role's landing page.
#[utoipa::path(
    post,
    path = "/accounts/{role}/register",
    request_body(content = RegisterRequest, content_type = "application/x-www-form-urlencoded"),
    params(("role" = String, Path, description = "Account role, farmer or customer")),
    responses(
        (status = 303, description = "Account created, redirect to the landing page"),
        (status = 400, description = "A field failed validation", body = ApiError),
        (status = 409, description = "Phone number already registered", body = ApiError)
    ),
    tags = ["accounts"],
    operation_id = "register"
)]
#[post("/accounts/{role}/register")]
pub async fn register(
    state: web::Data<HttpState>,
    role: web::Path<Role>,
    form: web::Form<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let role = role.into_inner();
    state
        .accounts
        .register(role, &form.username, &form.phone, &form.password)
        .await
        .map_err(map_registration_error)?;
    Ok(see_other(role.homepage()))
}

/// Check credentials against the role's namespace and send the browser to
/// the role's landing page.
#[utoipa::path(
    post,
    path = "/accounts/{role}/login",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    params(("role" = String, Path, description = "Account role, farmer or customer")),
    responses(
        (status = 303, description = "Credentials accepted, redirect to the landing page"),
        (status = 401, description = "Unknown phone number or wrong password", body = ApiError)
    ),
    tags = ["accounts"],
    operation_id = "login"
)]
#[post("/accounts/{role}/login")]
pub async fn login(
    state: web::Data<HttpState>,
    role: web::Path<Role>,
    form: web::Form<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let role = role.into_inner();
    state
        .accounts
        .authenticate(role, &form.phone, &form.password)
        .await
        .map_err(map_auth_error)?;
    Ok(see_other(role.homepage()))
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn map_registration_error(error: RegistrationError) -> ApiError {
    match error {
        RegistrationError::Validation(validation) => {
            let field = validation.field();
            DomainError::invalid_request(validation.to_string())
                .with_details(json!({ "field": field }))
                .into()
        }
        RegistrationError::DuplicateAccount => {
            DomainError::conflict("an account with this phone number already exists").into()
        }
        RegistrationError::Hash(hash) => {
            warn!(error = %hash, "password hashing failed");
            DomainError::internal("password hashing failed").into()
        }
        RegistrationError::Storage(storage) => storage_error(storage),
    }
}

/// Unknown phone and wrong password deliberately share one message so the
/// response does not reveal which phone numbers hold accounts.
fn map_auth_error(error: AuthError) -> ApiError {
    match error {
        AuthError::AccountNotFound | AuthError::InvalidCredentials => {
            DomainError::unauthorized("invalid phone number or password").into()
        }
        AuthError::Hash(hash) => {
            warn!(error = %hash, "password verification failed");
            DomainError::internal("password verification failed").into()
        }
        AuthError::Storage(storage) => storage_error(storage),
    }
}

fn storage_error(error: AccountPersistenceError) -> ApiError {
    warn!(error = %error, "account storage failed");
    match error {
        AccountPersistenceError::Connection { .. } => {
            DomainError::service_unavailable("account storage is unavailable").into()
        }
        AccountPersistenceError::Query { .. } | AccountPersistenceError::Duplicate => {
            DomainError::internal("account storage failed").into()
        }
    }
}
