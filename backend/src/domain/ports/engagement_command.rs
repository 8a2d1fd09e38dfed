//! Driving port for likes and comments.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Comment, CommentText, Error, Like, UserId, VideoId};

/// Domain use-case port for engaging with a video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementCommand: Send + Sync {
    /// Like `video_id` as `user_id`.
    async fn like(&self, user_id: &UserId, video_id: &VideoId) -> Result<Like, Error>;

    /// Comment on `video_id` as `user_id`.
    async fn comment(
        &self,
        user_id: &UserId,
        video_id: &VideoId,
        text: CommentText,
    ) -> Result<Comment, Error>;
}

/// Fixture command that records nothing and echoes the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEngagementCommand;

#[async_trait]
impl EngagementCommand for FixtureEngagementCommand {
    async fn like(&self, user_id: &UserId, video_id: &VideoId) -> Result<Like, Error> {
        Ok(Like {
            id: Uuid::new_v4(),
            user_id: *user_id,
            video_id: *video_id,
            created_at: Utc::now(),
        })
    }

    async fn comment(
        &self,
        user_id: &UserId,
        video_id: &VideoId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        Ok(Comment {
            id: Uuid::new_v4(),
            user_id: *user_id,
            video_id: *video_id,
            text,
            created_at: Utc::now(),
        })
    }
}
