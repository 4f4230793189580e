//! HTTP server configuration object and environment settings.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::domain::listing::ListingLimits;
use crate::outbound::persistence::DbPool;

/// Default generative endpoint used when none is configured.
const DEFAULT_DIAGNOSIS_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro-002:generateContent";

/// Outbound call cap for the diagnosis service. Calls are not retried.
const DEFAULT_DIAGNOSIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the generative diagnosis service.
#[derive(Debug, Clone)]
pub struct DiagnosisConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl DiagnosisConfig {
    /// Point at the default endpoint with the given API key.
    ///
    /// # Errors
    ///
    /// Returns a parse error only if the built-in endpoint constant is
    /// malformed, which would be a programming error caught in tests.
    pub fn new(api_key: impl Into<String>) -> Result<Self, url::ParseError> {
        Ok(Self {
            endpoint: Url::parse(DEFAULT_DIAGNOSIS_ENDPOINT)?,
            api_key: api_key.into(),
            timeout: DEFAULT_DIAGNOSIS_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) diagnosis: DiagnosisConfig,
    pub(crate) upload_dir: PathBuf,
    pub(crate) static_root: PathBuf,
    pub(crate) listing_limits: ListingLimits,
    pub(crate) bcrypt_cost: Option<u32>,
}

impl ServerConfig {
    /// Construct a server configuration with default directories and limits.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, diagnosis: DiagnosisConfig) -> Self {
        Self {
            bind_addr,
            db_pool,
            diagnosis,
            upload_dir: PathBuf::from("uploads"),
            static_root: PathBuf::from("public"),
            listing_limits: ListingLimits::default(),
            bcrypt_cost: None,
        }
    }

    /// Directory uploaded images are written to and served from.
    #[must_use]
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Root directory of the static page collection.
    #[must_use]
    pub fn with_static_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_root = dir.into();
        self
    }

    /// Override the listing price/quantity bounds.
    #[must_use]
    pub fn with_listing_limits(mut self, limits: ListingLimits) -> Self {
        self.listing_limits = limits;
        self
    }

    /// Override the bcrypt work factor.
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Raw process settings read from the environment.
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub diagnosis_endpoint: Url,
    pub diagnosis_api_key: String,
    pub diagnosis_timeout: Duration,
    pub upload_dir: PathBuf,
    pub static_root: PathBuf,
}

/// Failures raised while reading process settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("environment variable {name} is required")]
    Missing { name: &'static str },
    #[error("environment variable {name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// `DATABASE_URL` and an API key (`DIAGNOSIS_API_KEY`, falling back to
    /// `GEMINI_API_KEY`) are required; everything else has a default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a required variable is absent or a
    /// value fails to parse.
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = require("DATABASE_URL")?;
        let diagnosis_api_key = std::env::var("DIAGNOSIS_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| SettingsError::Missing {
                name: "DIAGNOSIS_API_KEY",
            })?;

        let bind_addr = parse_or(
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 8080)),
            |raw| raw.parse(),
        )?;
        let diagnosis_endpoint = match std::env::var("DIAGNOSIS_ENDPOINT") {
            Ok(raw) => Url::parse(&raw).map_err(|err| SettingsError::Invalid {
                name: "DIAGNOSIS_ENDPOINT",
                message: err.to_string(),
            })?,
            Err(_) => Url::parse(DEFAULT_DIAGNOSIS_ENDPOINT).map_err(|err| {
                SettingsError::Invalid {
                    name: "DIAGNOSIS_ENDPOINT",
                    message: err.to_string(),
                }
            })?,
        };
        let diagnosis_timeout = parse_or(
            "DIAGNOSIS_TIMEOUT_SECS",
            DEFAULT_DIAGNOSIS_TIMEOUT,
            |raw| raw.parse::<u64>().map(Duration::from_secs),
        )?;

        Ok(Self {
            bind_addr,
            database_url,
            diagnosis_endpoint,
            diagnosis_api_key,
            diagnosis_timeout,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map_or_else(|_| PathBuf::from("uploads"), PathBuf::from),
            static_root: std::env::var("STATIC_ROOT")
                .map_or_else(|_| PathBuf::from("public"), PathBuf::from),
        })
    }
}

fn require(name: &'static str) -> Result<String, SettingsError> {
    std::env::var(name).map_err(|_| SettingsError::Missing { name })
}

fn parse_or<T, E, F>(name: &'static str, default: T, parse: F) -> Result<T, SettingsError>
where
    E: std::fmt::Display,
    F: FnOnce(&str) -> Result<T, E>,
{
    match std::env::var(name) {
        Ok(raw) => parse(&raw).map_err(|err| SettingsError::Invalid {
            name,
            message: err.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
