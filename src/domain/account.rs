//! Account data model for the two marketplace roles.
//!
//! Farmers and customers live in separate tables with independent phone
//! namespaces. The [`Role`] variant selects which one an operation targets,
//! so the credential logic exists exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which of the two independent account namespaces a request pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Customer,
}

impl Role {
    /// Page the browser is redirected to after a successful signup or login.
    pub fn homepage(self) -> &'static str {
        match self {
            Role::Farmer => "/home",
            Role::Customer => "/homecus",
        }
    }

    /// Lowercase name used in routes and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by the account field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyUsername,
    EmptyPhone,
    InvalidPhone,
    EmptyPassword,
    PasswordTooShort { min: usize },
}

impl AccountValidationError {
    /// Form field the error pertains to, for field-scoped error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPhone | Self::InvalidPhone => "phone",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPhone => write!(f, "phone number must not be empty"),
            Self::InvalidPhone => {
                write!(f, "phone number must be exactly 10 digits")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Database identifier of a registered account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AccountId(i32);

impl AccountId {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty account display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(value: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Phone number: exactly 10 ASCII digits.
///
/// Phones identify accounts within a role, so the format check happens here
/// before anything touches the hasher or the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    pub fn new(value: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let raw = value.as_ref().trim();
        if raw.is_empty() {
            return Err(AccountValidationError::EmptyPhone);
        }
        if raw.len() != 10 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountValidationError::InvalidPhone);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext password accepted at registration; never stored or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

const MIN_PASSWORD_LENGTH: usize = 6;

impl Password {
    pub fn new(value: impl Into<String>) -> Result<Self, AccountValidationError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        if raw.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(redacted)")
    }
}

/// Account fields handed to the repository after validation and hashing.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub phone: Phone,
    pub password_hash: String,
}

/// Account row as read back from a repository.
#[derive(Debug, Clone)]
pub struct StoredAccount {
    pub id: AccountId,
    pub username: String,
    pub phone: String,
    pub password_hash: String,
}

/// Identity returned to the caller on successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub id: AccountId,
    pub username: String,
}
