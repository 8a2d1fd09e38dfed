//! Account domain service: registration, login and profile reads.
//!
//! Implements the account driving ports on top of a [`UserRepository`] and a
//! [`CredentialHasher`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, LoginService, RegistrationService,
    UserPersistenceError, UserProfileQuery, UserRepository,
};
use crate::domain::{Error, LoginCredentials, Registration, StoredUser, User, UserId};

const USER_EXISTS: &str = "User exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountService<R, H> {
    /// Create a new service over the given repository and hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> AccountService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::Duplicate { .. } => Error::invalid_request(USER_EXISTS),
        }
    }

    fn map_hasher_error(error: CredentialHasherError) -> Error {
        Error::internal(error.to_string())
    }
}

#[async_trait]
impl<R, H> RegistrationService for AccountService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let taken = self
            .users
            .exists_with_email_or_username(registration.email(), registration.username())
            .await
            .map_err(Self::map_user_error)?;
        if taken {
            return Err(Error::invalid_request(USER_EXISTS));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(Self::map_hasher_error)?;

        let user = User {
            id: UserId::random(),
            email: registration.email().clone(),
            username: registration.username().clone(),
            image: None,
            created_at: Utc::now(),
        };
        let stored = StoredUser {
            user,
            password_hash,
        };
        self.users
            .insert(&stored)
            .await
            .map_err(Self::map_user_error)?;

        info!(user_id = %stored.user.id, "account registered");
        Ok(stored.user)
    }
}

#[async_trait]
impl<R, H> LoginService for AccountService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(Self::map_hasher_error)?;
        if !verified {
            warn!(user_id = %stored.user.id, "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(stored.user)
    }
}

#[async_trait]
impl<R, H> UserProfileQuery for AccountService<R, H>
where
    R: UserRepository,
    H: CredentialHasher,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized("Unauthorized"))
    }
}
