//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `FeedQuery`, ...) are called by inbound
//! adapters; driven ports (`UserRepository`, `VideoStorage`, ...) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_hasher;
mod engagement_command;
mod engagement_repository;
mod feed_query;
mod login_service;
mod registration_service;
mod user_profile_query;
mod user_repository;
mod video_repository;
mod video_storage;
mod video_upload_command;

pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
#[cfg(test)]
pub use engagement_command::MockEngagementCommand;
pub use engagement_command::{EngagementCommand, FixtureEngagementCommand};
#[cfg(test)]
pub use engagement_repository::MockEngagementRepository;
pub use engagement_repository::{EngagementPersistenceError, EngagementRepository};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::{FeedQuery, FixtureFeedQuery};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub(crate) use login_service::{FIXTURE_EMAIL, FIXTURE_PASSWORD, FIXTURE_USER_ID};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::{FixtureRegistrationService, RegistrationService};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::{FixtureUserProfileQuery, UserProfileQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use video_repository::MockVideoRepository;
pub use video_repository::{VideoPersistenceError, VideoRepository};
#[cfg(test)]
pub use video_storage::MockVideoStorage;
pub use video_storage::{VideoBlob, VideoStorage, VideoStorageError};
#[cfg(test)]
pub use video_upload_command::MockVideoUploadCommand;
pub use video_upload_command::{FixtureVideoUploadCommand, UploadRequest, VideoUploadCommand};
