//! Driven port for video reads and writes.
//!
//! Feed-shaped reads return fully assembled [`FeedVideo`] values so adapters
//! can batch the author, hashtag and engagement lookups however suits their
//! backing store.

use async_trait::async_trait;

use crate::domain::{
    CategoryCount, FeedFilter, FeedVideo, NewVideo, TrendingHashtag, Video, VideoId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by video repository adapters.
    pub enum VideoPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "video repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "video repository query failed: {message}",
    }
}

/// Port for video persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert the video and connect it to its hashtags, creating missing
    /// hashtags by name, atomically.
    async fn insert_with_hashtags(&self, video: &NewVideo) -> Result<Video, VideoPersistenceError>;

    /// Newest videos first (ties broken by id), narrowed by `filter`.
    async fn list_feed(
        &self,
        filter: &FeedFilter,
        limit: usize,
    ) -> Result<Vec<FeedVideo>, VideoPersistenceError>;

    /// Videos ordered by creation time then view count, both descending.
    async fn list_recommended(&self, limit: usize) -> Result<Vec<FeedVideo>, VideoPersistenceError>;

    /// Per-category video counts for non-null categories, largest first then
    /// by name.
    async fn category_counts(&self) -> Result<Vec<CategoryCount>, VideoPersistenceError>;

    /// Hashtags attached to the most videos, largest first then by name.
    async fn trending_hashtags(
        &self,
        limit: usize,
    ) -> Result<Vec<TrendingHashtag>, VideoPersistenceError>;

    /// Whether a video with this id exists.
    async fn exists(&self, id: &VideoId) -> Result<bool, VideoPersistenceError>;
}
