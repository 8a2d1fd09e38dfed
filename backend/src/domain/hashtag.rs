//! Hashtag names and trending aggregates.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum hashtag length in characters, after normalisation.
pub const HASHTAG_MAX: usize = 64;

/// Validation errors raised by [`HashtagName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashtagValidationError {
    /// Nothing was left once `#` and whitespace were stripped.
    #[error("hashtag must not be empty")]
    Empty,
    /// Name exceeded [`HASHTAG_MAX`].
    #[error("hashtag must be at most {HASHTAG_MAX} characters")]
    TooLong,
    /// Name contained characters other than letters, digits or `_`.
    #[error("hashtag may only contain letters, numbers, or underscores")]
    InvalidCharacters,
}

/// Normalised hashtag: no leading `#`, lower case.
///
/// `#Dance`, `dance` and `  ##DANCE ` all name the same tag.
///
/// # Examples
/// ```
/// use clipstream::domain::HashtagName;
///
/// let tag = HashtagName::new("#Dance").unwrap();
/// assert_eq!(tag.as_ref(), "dance");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HashtagName(String);

impl HashtagName {
    /// Normalise and validate a single hashtag token.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, HashtagValidationError> {
        let normalised = raw
            .as_ref()
            .trim()
            .trim_start_matches('#')
            .to_lowercase();
        if normalised.is_empty() {
            return Err(HashtagValidationError::Empty);
        }
        if normalised.chars().count() > HASHTAG_MAX {
            return Err(HashtagValidationError::TooLong);
        }
        if !normalised
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(HashtagValidationError::InvalidCharacters);
        }
        Ok(Self(normalised))
    }

    /// Normalise a list of tokens, dropping duplicates but keeping the order
    /// in which names were first seen.
    pub fn parse_list<I, S>(tokens: I) -> Result<Vec<Self>, HashtagValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for token in tokens {
            let name = Self::new(token)?;
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
        Ok(names)
    }
}

impl AsRef<str> for HashtagName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for HashtagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<HashtagName> for String {
    fn from(value: HashtagName) -> Self {
        value.0
    }
}

impl TryFrom<String> for HashtagName {
    type Error = HashtagValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Hashtag together with the number of videos carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendingHashtag {
    pub id: Uuid,
    #[schema(value_type = String, example = "dance")]
    pub name: HashtagName,
    pub video_count: i64,
}
