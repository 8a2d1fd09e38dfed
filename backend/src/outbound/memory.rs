//! In-process store implementing every repository port.
//!
//! Used when no `database_url` is configured and by the integration suite.
//! Ordering, uniqueness and not-found behaviour follow the PostgreSQL
//! adapters so the two are interchangeable behind the ports.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    EngagementPersistenceError, EngagementRepository, UserPersistenceError, UserRepository,
    VideoPersistenceError, VideoRepository,
};
use crate::domain::{
    CategoryCount, Comment, Email, FeedFilter, FeedVideo, HashtagName, Like, NewVideo,
    StoredUser, TrendingHashtag, User, UserId, Username, Video, VideoId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct State {
    users: Vec<StoredUser>,
    videos: Vec<Video>,
    hashtags: Vec<(Uuid, HashtagName)>,
    video_hashtags: Vec<(VideoId, Uuid)>,
    likes: Vec<Like>,
    comments: Vec<Comment>,
}

impl State {
    fn hashtags_of(&self, video_id: &VideoId) -> Vec<HashtagName> {
        let mut names: Vec<HashtagName> = self
            .video_hashtags
            .iter()
            .filter(|(id, _)| id == video_id)
            .filter_map(|(_, tag_id)| {
                self.hashtags
                    .iter()
                    .find(|(id, _)| id == tag_id)
                    .map(|(_, name)| name.clone())
            })
            .collect();
        names.sort();
        names
    }

    fn hashtag_id(&mut self, name: &HashtagName) -> Uuid {
        if let Some((id, _)) = self.hashtags.iter().find(|(_, existing)| existing == name) {
            return *id;
        }
        let id = Uuid::new_v4();
        self.hashtags.push((id, name.clone()));
        id
    }

    /// Mirror the PostgreSQL foreign keys on `likes` and `comments`.
    fn ensure_engagement_targets(
        &self,
        user_id: &UserId,
        video_id: &VideoId,
    ) -> Result<(), EngagementPersistenceError> {
        if !self.videos.iter().any(|video| &video.id == video_id) {
            return Err(EngagementPersistenceError::video_not_found());
        }
        if !self.users.iter().any(|stored| &stored.user.id == user_id) {
            return Err(EngagementPersistenceError::user_not_found());
        }
        Ok(())
    }

    fn feed_entry(&self, video: &Video) -> Result<FeedVideo, VideoPersistenceError> {
        let user = self
            .users
            .iter()
            .find(|stored| stored.user.id == video.user_id)
            .map(|stored| stored.user.summary())
            .ok_or_else(|| {
                VideoPersistenceError::query(format!("author of video {} missing", video.id))
            })?;
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|comment| comment.video_id == video.id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| Reverse(comment.created_at));
        Ok(FeedVideo {
            video: video.clone(),
            user,
            hashtags: self.hashtags_of(&video.id),
            likes: self
                .likes
                .iter()
                .filter(|like| like.video_id == video.id)
                .cloned()
                .collect(),
            comments,
        })
    }
}

/// Thread-safe in-memory implementation of the repository ports.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use clipstream::domain::{AccountService, FeedService};
/// use clipstream::outbound::{Argon2Hasher, InMemoryStore};
///
/// let store = Arc::new(InMemoryStore::default());
/// let accounts = AccountService::new(store.clone(), Arc::new(Argon2Hasher::default()));
/// let feed = FeedService::new(store);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<StoredUser>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .iter()
            .find(|stored| &stored.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .iter()
            .find(|stored| &stored.user.id == id)
            .map(|stored| stored.user.clone()))
    }

    async fn exists_with_email_or_username(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<bool, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .iter()
            .any(|stored| &stored.user.email == email || &stored.user.username == username))
    }

    async fn insert(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if let Some(clash) = state.users.iter().find_map(|stored| {
            if stored.user.email == user.user.email {
                Some("users_email_key")
            } else if stored.user.username == user.user.username {
                Some("users_username_key")
            } else {
                None
            }
        }) {
            return Err(UserPersistenceError::duplicate(clash));
        }
        state.users.push(user.clone());
        Ok(())
    }
}

#[async_trait]
impl VideoRepository for InMemoryStore {
    async fn insert_with_hashtags(&self, video: &NewVideo) -> Result<Video, VideoPersistenceError> {
        let mut state = self.lock().map_err(VideoPersistenceError::query)?;
        if !state.users.iter().any(|stored| stored.user.id == video.owner) {
            return Err(VideoPersistenceError::query("video owner does not exist"));
        }
        let stored = Video {
            id: video.id,
            user_id: video.owner,
            url: video.url.clone(),
            description: video.description.clone(),
            category: video.category.clone(),
            views: 0,
            created_at: video.created_at,
        };
        for name in &video.hashtags {
            let tag_id = state.hashtag_id(name);
            if !state.video_hashtags.contains(&(video.id, tag_id)) {
                state.video_hashtags.push((video.id, tag_id));
            }
        }
        state.videos.push(stored.clone());
        Ok(stored)
    }

    async fn list_feed(
        &self,
        filter: &FeedFilter,
        limit: usize,
    ) -> Result<Vec<FeedVideo>, VideoPersistenceError> {
        let state = self.lock().map_err(VideoPersistenceError::query)?;
        let mut matching: Vec<&Video> = state
            .videos
            .iter()
            .filter(|video| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|category| video.category.as_ref() == Some(category))
            })
            .filter(|video| {
                filter
                    .hashtag
                    .as_ref()
                    .is_none_or(|tag| state.hashtags_of(&video.id).contains(tag))
            })
            .collect();
        matching.sort_by_key(|video| Reverse((video.created_at, *video.id.as_uuid())));
        matching
            .into_iter()
            .take(limit)
            .map(|video| state.feed_entry(video))
            .collect()
    }

    async fn list_recommended(&self, limit: usize) -> Result<Vec<FeedVideo>, VideoPersistenceError> {
        let state = self.lock().map_err(VideoPersistenceError::query)?;
        let mut ordered: Vec<&Video> = state.videos.iter().collect();
        ordered.sort_by_key(|video| Reverse((video.created_at, video.views)));
        ordered
            .into_iter()
            .take(limit)
            .map(|video| state.feed_entry(video))
            .collect()
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, VideoPersistenceError> {
        let state = self.lock().map_err(VideoPersistenceError::query)?;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for category in state.videos.iter().filter_map(|video| video.category.as_ref()) {
            *counts.entry(category.as_ref()).or_default() += 1;
        }
        let mut rows: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_owned(),
                count,
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
        Ok(rows)
    }

    async fn trending_hashtags(
        &self,
        limit: usize,
    ) -> Result<Vec<TrendingHashtag>, VideoPersistenceError> {
        let state = self.lock().map_err(VideoPersistenceError::query)?;
        let mut rows: Vec<TrendingHashtag> = state
            .hashtags
            .iter()
            .map(|(id, name)| TrendingHashtag {
                id: *id,
                name: name.clone(),
                video_count: state
                    .video_hashtags
                    .iter()
                    .filter(|(_, tag_id)| tag_id == id)
                    .count()
                    .try_into()
                    .unwrap_or(i64::MAX),
            })
            .filter(|row| row.video_count > 0)
            .collect();
        rows.sort_by(|a, b| {
            b.video_count
                .cmp(&a.video_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    async fn exists(&self, id: &VideoId) -> Result<bool, VideoPersistenceError> {
        let state = self.lock().map_err(VideoPersistenceError::query)?;
        Ok(state.videos.iter().any(|video| &video.id == id))
    }
}

#[async_trait]
impl EngagementRepository for InMemoryStore {
    async fn insert_like(&self, like: &Like) -> Result<(), EngagementPersistenceError> {
        let mut state = self.lock().map_err(EngagementPersistenceError::query)?;
        state.ensure_engagement_targets(&like.user_id, &like.video_id)?;
        if state
            .likes
            .iter()
            .any(|existing| existing.user_id == like.user_id && existing.video_id == like.video_id)
        {
            return Err(EngagementPersistenceError::already_liked());
        }
        state.likes.push(like.clone());
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), EngagementPersistenceError> {
        let mut state = self.lock().map_err(EngagementPersistenceError::query)?;
        state.ensure_engagement_targets(&comment.user_id, &comment.video_id)?;
        state.comments.push(comment.clone());
        Ok(())
    }
}
