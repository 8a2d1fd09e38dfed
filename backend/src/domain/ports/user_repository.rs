//! Driven port for account persistence.
use async_trait::async_trait;

use crate::domain::{Email, StoredUser, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Email or username already belongs to another account.
        Duplicate { message: String } => "user already exists: {message}",
    }
}

/// Port for reading and creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch an account and its password hash by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Whether any account already uses `email` or `username`.
    async fn exists_with_email_or_username(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<bool, UserPersistenceError>;

    /// Insert a new account.
    ///
    /// Unique-constraint races surface as [`UserPersistenceError::Duplicate`].
    async fn insert(&self, user: &StoredUser) -> Result<(), UserPersistenceError>;
}
