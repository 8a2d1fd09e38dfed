//! Video, like and comment types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{HashtagName, UserId, UserSummary};

/// Maximum category length in characters.
pub const CATEGORY_MAX: usize = 64;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 2200;
/// Maximum comment length in characters.
pub const COMMENT_MAX: usize = 1000;

/// Validation errors raised by the video value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VideoValidationError {
    /// Identifier was not a UUID.
    #[error("video id must be a valid UUID")]
    InvalidId,
    /// Category exceeded [`CATEGORY_MAX`].
    #[error("category must be at most {CATEGORY_MAX} characters")]
    CategoryTooLong,
    /// Description exceeded [`DESCRIPTION_MAX`].
    #[error("description must be at most {DESCRIPTION_MAX} characters")]
    DescriptionTooLong,
    /// Comment text was blank.
    #[error("comment text must not be empty")]
    EmptyComment,
    /// Comment text exceeded [`COMMENT_MAX`].
    #[error("comment text must be at most {COMMENT_MAX} characters")]
    CommentTooLong,
}

/// Stable video identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(Uuid);

impl VideoId {
    /// Parse a textual identifier.
    pub fn new(id: impl AsRef<str>) -> Result<Self, VideoValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(VideoValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| VideoValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<VideoId> for String {
    fn from(value: VideoId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for VideoId {
    type Error = VideoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-form grouping label chosen by the uploader, e.g. `"comedy"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Parse an optional category; blank input means "no category".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, VideoValidationError> {
        let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(None);
        };
        if trimmed.chars().count() > CATEGORY_MAX {
            return Err(VideoValidationError::CategoryTooLong);
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

/// Caption shown under a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoDescription(String);

impl VideoDescription {
    /// Parse an optional description; blank input means "no description".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, VideoValidationError> {
        let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(None);
        };
        if trimmed.chars().count() > DESCRIPTION_MAX {
            return Err(VideoValidationError::DescriptionTooLong);
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for VideoDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Body of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentText(String);

impl CommentText {
    /// Validate comment text. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, VideoValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(VideoValidationError::EmptyComment);
        }
        if trimmed.chars().count() > COMMENT_MAX {
            return Err(VideoValidationError::CommentTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Persisted video row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[schema(value_type = String)]
    pub id: VideoId,
    #[schema(value_type = String)]
    pub user_id: UserId,
    /// Public URL returned by the storage backend.
    pub url: String,
    #[schema(value_type = Option<String>)]
    pub description: Option<VideoDescription>,
    #[schema(value_type = Option<String>)]
    pub category: Option<Category>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// Video to be inserted together with its hashtags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    pub id: VideoId,
    pub owner: UserId,
    pub url: String,
    pub description: Option<VideoDescription>,
    pub category: Option<Category>,
    pub hashtags: Vec<HashtagName>,
    pub created_at: DateTime<Utc>,
}

/// A like left by a user on a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[schema(value_type = String)]
    pub video_id: VideoId,
    pub created_at: DateTime<Utc>,
}

/// A comment left by a user on a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[schema(value_type = String)]
    pub video_id: VideoId,
    #[schema(value_type = String)]
    pub text: CommentText,
    pub created_at: DateTime<Utc>,
}

/// Feed entry: a video with its author and engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedVideo {
    #[serde(flatten)]
    pub video: Video,
    pub user: UserSummary,
    /// Normalised hashtag names, without the leading `#`.
    #[schema(value_type = Vec<String>)]
    pub hashtags: Vec<HashtagName>,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}
