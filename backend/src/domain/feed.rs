//! Feed filters, page sizes and aggregate rows.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Category, HashtagName};

/// Number of videos returned by one feed read.
pub const FEED_PAGE_SIZE: usize = 20;
/// Number of hashtags returned by the trending query.
pub const TRENDING_LIMIT: usize = 10;
/// Default size of the recommended list.
pub const RECOMMENDED_DEFAULT: usize = 20;
/// Upper bound on the recommended list size.
pub const RECOMMENDED_MAX: usize = 50;

/// Optional filters applied to the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedFilter {
    /// Only videos in this category.
    pub category: Option<Category>,
    /// Only videos carrying this hashtag.
    pub hashtag: Option<HashtagName>,
}

/// Size of the recommended list, clamped to `1..=RECOMMENDED_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendedLimit(usize);

impl RecommendedLimit {
    /// Clamp a caller-supplied limit; `None` selects [`RECOMMENDED_DEFAULT`].
    pub fn clamped(requested: Option<i64>) -> Self {
        let value = requested.map_or(RECOMMENDED_DEFAULT, |raw| match usize::try_from(raw) {
            Ok(limit) => limit.clamp(1, RECOMMENDED_MAX),
            Err(_) if raw < 0 => 1,
            Err(_) => RECOMMENDED_MAX,
        });
        Self(value)
    }

    /// The effective limit.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for RecommendedLimit {
    fn default() -> Self {
        Self(RECOMMENDED_DEFAULT)
    }
}

/// Number of videos in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    #[schema(example = "comedy")]
    pub category: String,
    pub count: i64,
}
