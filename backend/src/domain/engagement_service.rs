//! Engagement domain service: likes and comments.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::feed_service::map_video_error;
use crate::domain::ports::{
    EngagementCommand, EngagementPersistenceError, EngagementRepository, VideoRepository,
};
use crate::domain::{Comment, CommentText, Error, Like, UserId, VideoId};

const VIDEO_NOT_FOUND: &str = "Video not found";

/// Write-side service implementing [`EngagementCommand`].
#[derive(Clone)]
pub struct EngagementService<V, E> {
    videos: Arc<V>,
    engagement: Arc<E>,
}

impl<V, E> EngagementService<V, E> {
    /// Create a new service over the given repositories.
    pub fn new(videos: Arc<V>, engagement: Arc<E>) -> Self {
        Self { videos, engagement }
    }
}

impl<V, E> EngagementService<V, E>
where
    V: VideoRepository,
    E: EngagementRepository,
{
    fn map_engagement_error(error: EngagementPersistenceError) -> Error {
        match error {
            EngagementPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("engagement repository unavailable: {message}"))
            }
            EngagementPersistenceError::Query { message } => {
                Error::internal(format!("engagement repository error: {message}"))
            }
            EngagementPersistenceError::AlreadyLiked => Error::conflict("Already liked"),
            EngagementPersistenceError::VideoNotFound => Error::not_found(VIDEO_NOT_FOUND),
            // A session can outlive its account; treat it like a missing session.
            EngagementPersistenceError::UserNotFound => Error::unauthorized("Unauthorized"),
        }
    }

    async fn ensure_video_exists(&self, video_id: &VideoId) -> Result<(), Error> {
        if self.videos.exists(video_id).await.map_err(map_video_error)? {
            Ok(())
        } else {
            debug!(%video_id, "engagement on unknown video");
            Err(Error::not_found(VIDEO_NOT_FOUND))
        }
    }
}

#[async_trait]
impl<V, E> EngagementCommand for EngagementService<V, E>
where
    V: VideoRepository,
    E: EngagementRepository,
{
    async fn like(&self, user_id: &UserId, video_id: &VideoId) -> Result<Like, Error> {
        self.ensure_video_exists(video_id).await?;
        let like = Like {
            id: Uuid::new_v4(),
            user_id: *user_id,
            video_id: *video_id,
            created_at: Utc::now(),
        };
        // The existence check can race with a delete; the repository still
        // reports a missing video.
        self.engagement
            .insert_like(&like)
            .await
            .map_err(Self::map_engagement_error)?;
        Ok(like)
    }

    async fn comment(
        &self,
        user_id: &UserId,
        video_id: &VideoId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        self.ensure_video_exists(video_id).await?;
        let comment = Comment {
            id: Uuid::new_v4(),
            user_id: *user_id,
            video_id: *video_id,
            text,
            created_at: Utc::now(),
        };
        self.engagement
            .insert_comment(&comment)
            .await
            .map_err(Self::map_engagement_error)?;
        Ok(comment)
    }
}
