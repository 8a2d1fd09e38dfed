//! Driven port for likes and comments.
use async_trait::async_trait;

use crate::domain::{Comment, Like};

use super::define_port_error;

define_port_error! {
    /// Errors raised by engagement repository adapters.
    pub enum EngagementPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "engagement repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "engagement repository query failed: {message}",
        /// The user already liked this video.
        AlreadyLiked => "video already liked by user",
        /// The referenced video does not exist.
        VideoNotFound => "video not found",
        /// The acting user no longer exists.
        UserNotFound => "user not found",
    }
}

/// Port for recording engagement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Record a like; at most one per user and video.
    async fn insert_like(&self, like: &Like) -> Result<(), EngagementPersistenceError>;

    /// Record a comment.
    async fn insert_comment(&self, comment: &Comment) -> Result<(), EngagementPersistenceError>;
}
