//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed values shared by the HTTP and persistence
//! adapters, the ports that connect them, and the services implementing the
//! use-cases. Types validate on construction and document their serde
//! contracts in their own Rustdoc.
//!
//! Public surface:
//! - `Error`/`ErrorCode`: transport-agnostic failure payload.
//! - `TraceId`: request correlation identifier.
//! - Users (`UserId`, `Email`, `Username`, `User`) and auth inputs
//!   (`Registration`, `LoginCredentials`).
//! - Videos (`VideoId`, `Category`, `HashtagName`, `FeedVideo`, ...).
//! - Services: `AccountService`, `FeedService`, `EngagementService`,
//!   `UploadService`.

pub mod auth;
pub mod error;
pub mod feed;
pub mod hashtag;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod video;

mod accounts_service;
mod engagement_service;
mod feed_service;
mod upload_service;

pub use self::accounts_service::AccountService;
pub use self::auth::{AuthValidationError, LoginCredentials, Registration};
pub use self::engagement_service::EngagementService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::feed::{
    CategoryCount, FEED_PAGE_SIZE, FeedFilter, RecommendedLimit, TRENDING_LIMIT,
};
pub use self::feed_service::FeedService;
pub use self::hashtag::{HashtagName, HashtagValidationError, TrendingHashtag};
pub use self::trace_id::TraceId;
pub use self::upload_service::{UPLOAD_MAX_BYTES, UploadService};
pub use self::user::{Email, User, UserId, UserSummary, UserValidationError, Username};
pub use self::video::{
    Category, Comment, CommentText, FeedVideo, Like, NewVideo, Video, VideoDescription, VideoId,
    VideoValidationError,
};

/// Account row including the stored password hash.
///
/// Only repositories and the account service see this type; responses carry
/// [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use clipstream::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
