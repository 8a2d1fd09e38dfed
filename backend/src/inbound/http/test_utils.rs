//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use super::state::HttpState;
use crate::domain::ports::{
    FixtureEngagementCommand, FixtureFeedQuery, FixtureLoginService, FixtureRegistrationService,
    FixtureUserProfileQuery, FixtureVideoUploadCommand,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// State wired entirely to fixture ports; override fields per test.
pub fn fixture_state() -> HttpState {
    HttpState {
        login: Arc::new(FixtureLoginService),
        registration: Arc::new(FixtureRegistrationService),
        profile: Arc::new(FixtureUserProfileQuery),
        feed: Arc::new(FixtureFeedQuery),
        engagement: Arc::new(FixtureEngagementCommand),
        uploads: Arc::new(FixtureVideoUploadCommand),
    }
}
