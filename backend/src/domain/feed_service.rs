//! Feed domain service: feed pages, recommendations and aggregates.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{FeedQuery, VideoPersistenceError, VideoRepository};
use crate::domain::{
    CategoryCount, Error, FEED_PAGE_SIZE, FeedFilter, FeedVideo, RecommendedLimit,
    TRENDING_LIMIT, TrendingHashtag,
};

/// Read-side service implementing [`FeedQuery`].
#[derive(Clone)]
pub struct FeedService<V> {
    videos: Arc<V>,
}

impl<V> FeedService<V> {
    /// Create a new service over the given repository.
    pub fn new(videos: Arc<V>) -> Self {
        Self { videos }
    }
}

pub(super) fn map_video_error(error: VideoPersistenceError) -> Error {
    match error {
        VideoPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("video repository unavailable: {message}"))
        }
        VideoPersistenceError::Query { message } => {
            Error::internal(format!("video repository error: {message}"))
        }
    }
}

#[async_trait]
impl<V> FeedQuery for FeedService<V>
where
    V: VideoRepository,
{
    async fn feed(&self, filter: &FeedFilter) -> Result<Vec<FeedVideo>, Error> {
        self.videos
            .list_feed(filter, FEED_PAGE_SIZE)
            .await
            .map_err(map_video_error)
    }

    async fn recommended(&self, limit: RecommendedLimit) -> Result<Vec<FeedVideo>, Error> {
        self.videos
            .list_recommended(limit.get())
            .await
            .map_err(map_video_error)
    }

    async fn categories(&self) -> Result<Vec<CategoryCount>, Error> {
        self.videos.category_counts().await.map_err(map_video_error)
    }

    async fn trending_hashtags(&self) -> Result<Vec<TrendingHashtag>, Error> {
        self.videos
            .trending_hashtags(TRENDING_LIMIT)
            .await
            .map_err(map_video_error)
    }
}
