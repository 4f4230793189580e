//! bcrypt-backed implementation of the password hashing port.
//!
//! bcrypt is CPU-bound by design, so both operations run on the blocking
//! pool instead of stalling the async executor.

use async_trait::async_trait;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Cost used for newly hashed passwords.
const DEFAULT_COST: u32 = 10;

/// Password hasher delegating to the bcrypt crate.
#[derive(Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl BcryptPasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the work factor, for deployments that tune it.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| PasswordHashError::execution(err.to_string()))?
            .map_err(|err| PasswordHashError::execution(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|err| PasswordHashError::execution(err.to_string()))?
            .map_err(|err| PasswordHashError::execution(err.to_string()))
    }
}
