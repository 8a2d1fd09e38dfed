//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing infrastructure, so
//! handler tests can substitute a double instead of wiring persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, Error, LoginCredentials, User, UserId, UserValidationError, Username};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown emails and wrong passwords are indistinguishable:
    /// both yield an unauthorized error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

pub(crate) const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
pub(crate) const FIXTURE_EMAIL: &str = "ada@example.com";
pub(crate) const FIXTURE_PASSWORD: &str = "password";

/// Build the account returned by the fixture driving ports.
pub(crate) fn fixture_user() -> Result<User, Error> {
    let invalid = |err: UserValidationError| Error::internal(format!("invalid fixture user: {err}"));
    Ok(User {
        id: UserId::new(FIXTURE_USER_ID).map_err(invalid)?,
        email: Email::new(FIXTURE_EMAIL).map_err(invalid)?,
        username: Username::new("ada_l").map_err(invalid)?,
        image: None,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    })
}

/// In-memory authenticator for handler tests.
///
/// `ada@example.com` / `password` authenticates and produces a fixed user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        if credentials.email().as_ref() == FIXTURE_EMAIL
            && credentials.password() == FIXTURE_PASSWORD
        {
            fixture_user()
        } else {
            Err(Error::unauthorized("Invalid credentials"))
        }
    }
}
