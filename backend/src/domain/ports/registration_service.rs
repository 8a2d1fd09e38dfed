//! Driving port for account sign-up.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Error, Registration, User, UserId};

use super::login_service::FIXTURE_EMAIL;

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account; fails when the email or username is taken.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}

/// Fixture sign-up that accepts everything except the fixture account email.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistrationService;

#[async_trait]
impl RegistrationService for FixtureRegistrationService {
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        if registration.email().as_ref() == FIXTURE_EMAIL {
            return Err(Error::invalid_request("User exists"));
        }
        Ok(User {
            id: UserId::random(),
            email: registration.email().clone(),
            username: registration.username().clone(),
            image: None,
            created_at: Utc::now(),
        })
    }
}
