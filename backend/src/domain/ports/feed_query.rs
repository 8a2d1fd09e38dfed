//! Driving port for read-only feed views.

use async_trait::async_trait;

use crate::domain::{CategoryCount, Error, FeedFilter, FeedVideo, RecommendedLimit, TrendingHashtag};

/// Domain use-case port for browsing videos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// One page of the reverse-chronological feed.
    async fn feed(&self, filter: &FeedFilter) -> Result<Vec<FeedVideo>, Error>;

    /// Recommended videos, newest then most viewed.
    async fn recommended(&self, limit: RecommendedLimit) -> Result<Vec<FeedVideo>, Error>;

    /// Video counts per category.
    async fn categories(&self) -> Result<Vec<CategoryCount>, Error>;

    /// Most used hashtags.
    async fn trending_hashtags(&self) -> Result<Vec<TrendingHashtag>, Error>;
}

/// Fixture query over an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedQuery;

#[async_trait]
impl FeedQuery for FixtureFeedQuery {
    async fn feed(&self, _filter: &FeedFilter) -> Result<Vec<FeedVideo>, Error> {
        Ok(Vec::new())
    }

    async fn recommended(&self, _limit: RecommendedLimit) -> Result<Vec<FeedVideo>, Error> {
        Ok(Vec::new())
    }

    async fn categories(&self) -> Result<Vec<CategoryCount>, Error> {
        Ok(Vec::new())
    }

    async fn trending_hashtags(&self) -> Result<Vec<TrendingHashtag>, Error> {
        Ok(Vec::new())
    }
}
