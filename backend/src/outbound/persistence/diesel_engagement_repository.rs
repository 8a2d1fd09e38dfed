//! PostgreSQL-backed `EngagementRepository` implementation using Diesel ORM.
//!
//! Duplicate likes and dangling video references are detected by the
//! `likes_user_video_key` unique constraint and the `*_video_id_fkey`
//! foreign keys, so concurrent requests cannot slip past a read-then-write
//! check. The `*_user_id_fkey` keys catch sessions whose account is gone.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EngagementPersistenceError, EngagementRepository};
use crate::domain::{Comment, Like};

use super::diesel_basic_error_mapping::{
    ViolationKind, map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::models::{CommentRow, LikeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, likes};

const LIKE_UNIQUE: &str = "likes_user_video_key";
const VIDEO_FOREIGN_KEYS: [&str; 2] = ["likes_video_id_fkey", "comments_video_id_fkey"];
const USER_FOREIGN_KEYS: [&str; 2] = ["likes_user_id_fkey", "comments_user_id_fkey"];

/// Diesel-backed implementation of the engagement repository port.
#[derive(Clone)]
pub struct DieselEngagementRepository {
    pool: DbPool,
}

impl DieselEngagementRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EngagementPersistenceError {
    map_basic_pool_error(error, EngagementPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EngagementPersistenceError {
    if violated_constraint(&error, ViolationKind::Unique).as_deref() == Some(LIKE_UNIQUE) {
        return EngagementPersistenceError::already_liked();
    }
    match violated_constraint(&error, ViolationKind::ForeignKey).as_deref() {
        Some(name) if VIDEO_FOREIGN_KEYS.contains(&name) => {
            return EngagementPersistenceError::video_not_found();
        }
        Some(name) if USER_FOREIGN_KEYS.contains(&name) => {
            return EngagementPersistenceError::user_not_found();
        }
        _ => {}
    }
    map_basic_diesel_error(
        error,
        EngagementPersistenceError::query,
        EngagementPersistenceError::connection,
    )
}

#[async_trait]
impl EngagementRepository for DieselEngagementRepository {
    async fn insert_like(&self, like: &Like) -> Result<(), EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = LikeRow {
            id: like.id,
            user_id: *like.user_id.as_uuid(),
            video_id: *like.video_id.as_uuid(),
            created_at: like.created_at,
        };
        diesel::insert_into(likes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), EngagementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = CommentRow {
            id: comment.id,
            user_id: *comment.user_id.as_uuid(),
            video_id: *comment.video_id.as_uuid(),
            text: comment.text.as_ref().to_owned(),
            created_at: comment.created_at,
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
