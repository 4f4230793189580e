//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::account::{AccountId, NewAccount, Phone, Role, StoredAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The phone number is already registered for this role.
        Duplicate => "an account with this phone number already exists",
    }
}

/// Persistence port for the two role-scoped account tables.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account row for the given role, returning its id.
    async fn insert(
        &self,
        role: Role,
        account: &NewAccount,
    ) -> Result<AccountId, AccountPersistenceError>;

    /// Fetch an account by phone within the role's namespace.
    async fn find_by_phone(
        &self,
        role: Role,
        phone: &Phone,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError>;
}
