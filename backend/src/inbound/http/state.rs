//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    EngagementCommand, FeedQuery, LoginService, RegistrationService, UserProfileQuery,
    VideoUploadCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub feed: Arc<dyn FeedQuery>,
    pub engagement: Arc<dyn EngagementCommand>,
    pub uploads: Arc<dyn VideoUploadCommand>,
}
