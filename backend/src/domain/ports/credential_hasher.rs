//! Driven port for password hashing.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum CredentialHasherError {
        /// Hash could not be produced or the stored hash is malformed.
        Hash { message: String } => "credential hashing failed: {message}",
    }
}

/// Port for hashing and verifying passwords.
///
/// Implementations are expected to be slow on purpose; they should keep that
/// work off the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing hash string (e.g. PHC format).
    async fn hash(&self, password: &str) -> Result<String, CredentialHasherError>;

    /// Check `password` against a hash produced by [`CredentialHasher::hash`].
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHasherError>;
}
