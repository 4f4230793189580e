//! Credential store use-cases: registration and authentication.
//!
//! Field validation happens in the account newtypes before any hashing or
//! storage, so a rejected password never reaches the hasher and a rejected
//! phone never reaches the repository.

use std::sync::Arc;

use tracing::info;

use crate::domain::account::{
    AccountId, AccountIdentity, AccountValidationError, NewAccount, Password, Phone, Role,
    Username,
};
use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, PasswordHashError, PasswordHasher,
};

/// Failures raised by [`AccountService::register`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] AccountValidationError),
    #[error("an account with this phone number already exists")]
    DuplicateAccount,
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    #[error(transparent)]
    Storage(AccountPersistenceError),
}

/// Failures raised by [`AccountService::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no account matches this phone number")]
    AccountNotFound,
    #[error("wrong password")]
    InvalidCredentials,
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    #[error(transparent)]
    Storage(#[from] AccountPersistenceError),
}

/// Role-parameterised credential store.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Validate the fields, reject duplicates, hash the password, and insert
    /// one account row for the role.
    pub async fn register(
        &self,
        role: Role,
        username: &str,
        phone: &str,
        password: &str,
    ) -> Result<AccountId, RegistrationError> {
        let username = Username::new(username)?;
        let phone = Phone::new(phone)?;
        let password = Password::new(password)?;

        if self
            .accounts
            .find_by_phone(role, &phone)
            .await
            .map_err(map_storage_error)?
            .is_some()
        {
            return Err(RegistrationError::DuplicateAccount);
        }

        let password_hash = self.hasher.hash(password.as_str()).await?;
        let account = NewAccount {
            username,
            phone,
            password_hash,
        };
        let id = self
            .accounts
            .insert(role, &account)
            .await
            .map_err(map_storage_error)?;
        info!(%role, account = %id, "account registered");
        Ok(id)
    }

    /// Check the phone/password pair against the role's table.
    ///
    /// The two failure modes stay distinct here; the HTTP layer collapses
    /// them into one generic message.
    pub async fn authenticate(
        &self,
        role: Role,
        phone: &str,
        password: &str,
    ) -> Result<AccountIdentity, AuthError> {
        // A phone that cannot exist in the table is indistinguishable from
        // one that simply is not there.
        let phone = Phone::new(phone).map_err(|_| AuthError::AccountNotFound)?;

        let stored = self
            .accounts
            .find_by_phone(role, &phone)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !self
            .hasher
            .verify(password, &stored.password_hash)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        info!(%role, account = %stored.id, "account authenticated");
        Ok(AccountIdentity {
            id: stored.id,
            username: stored.username,
        })
    }
}

/// Duplicate-key violations from the unique phone constraint surface as the
/// same duplicate-account failure as the pre-insert check.
fn map_storage_error(error: AccountPersistenceError) -> RegistrationError {
    match error {
        AccountPersistenceError::Duplicate => RegistrationError::DuplicateAccount,
        other => RegistrationError::Storage(other),
    }
}
