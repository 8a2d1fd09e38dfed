//! Driving port for reading the signed-in user's account.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

use super::login_service::fixture_user;

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the account for `user_id`.
    ///
    /// A session pointing at a deleted account is treated as unauthenticated.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}

/// Fixture profile query returning the fixture account with the requested id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileQuery;

#[async_trait]
impl UserProfileQuery for FixtureUserProfileQuery {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        let mut user = fixture_user()?;
        user.id = *user_id;
        Ok(user)
    }
}
