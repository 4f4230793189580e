//! Port abstraction for slow, salted password hashing.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not be executed.
        Execution { message: String } => "password hashing failed: {message}",
    }
}

/// Domain port for hashing and verifying passwords.
///
/// Implementations are expected to be deliberately slow (tunable cost
/// factor) and must embed a per-password salt in the produced hash.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted one-way hash of the password.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a candidate password against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
