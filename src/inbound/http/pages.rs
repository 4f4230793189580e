//! Named routes for the static page collection.
//!
//! Every page keeps a short route name decoupled from its file name, so the
//! HTML files can keep their historical names while the URLs stay tidy.

use actix_files::NamedFile;
use actix_web::{HttpRequest, get, web};

use crate::domain::DomainError;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Route name to HTML file, one entry per served page.
const PAGE_FILES: &[(&str, &str)] = &[
    ("login", "login.html"),
    ("signup", "signUp.html"),
    ("home", "homepage.html"),
    ("homecus", "homepage_cus.html"),
    ("health", "health.html"),
    ("sell", "selling.html"),
    ("market", "farmer-market.html"),
    ("marketcus", "farmer-market_cus.html"),
    ("whichusers", "whichusers.html"),
    ("signupcus", "signupcus.html"),
    ("logincus", "logincus.html"),
    ("predict", "prediction.html"),
    ("upload", "symptom.html"),
];

fn page_file(name: &str) -> Option<&'static str> {
    PAGE_FILES
        .iter()
        .find(|(route, _)| *route == name)
        .map(|(_, file)| *file)
}

async fn open_page(
    state: &HttpState,
    request: &HttpRequest,
    file: &str,
) -> ApiResult<actix_web::HttpResponse> {
    let path = state.static_root.join("pages").join(file);
    let named = NamedFile::open_async(path).await.map_err(|err| {
        tracing::error!(file, error = %err, "static page missing from disk");
        ApiError::from(DomainError::internal("page is not available"))
    })?;
    Ok(named.into_response(request))
}

/// Landing page.
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<actix_web::HttpResponse> {
    open_page(&state, &request, "index.html").await
}

/// Any named page from the collection. Registered after every API route so
/// it only sees paths nothing else claimed.
#[get("/{page}")]
pub async fn page(
    state: web::Data<HttpState>,
    request: HttpRequest,
    name: web::Path<String>,
) -> ApiResult<actix_web::HttpResponse> {
    let name = name.into_inner();
    let file = page_file(&name)
        .ok_or_else(|| ApiError::from(DomainError::not_found("page not found")))?;
    open_page(&state, &request, file).await
}
