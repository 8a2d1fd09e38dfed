//! PostgreSQL-backed `VideoRepository` implementation using Diesel ORM.
//!
//! Feed reads load one page of videos, then batch the author, hashtag, like
//! and comment lookups with `= ANY` filters so a page costs five queries
//! regardless of its size.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::BigInt;
use diesel::upsert::excluded;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{VideoPersistenceError, VideoRepository};
use crate::domain::{
    Category, CategoryCount, Comment, CommentText, FeedFilter, FeedVideo, HashtagName, Like,
    NewVideo, TrendingHashtag, UserId, UserSummary, Username, Video, VideoDescription, VideoId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    CategoryCountRow, CommentRow, LikeRow, NewHashtagRow, NewVideoRow, TrendingHashtagRow,
    VideoHashtagRow, VideoRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, hashtags, likes, users, video_hashtags, videos};

const CATEGORY_COUNTS_SQL: &str = r#"
SELECT category, COUNT(*) AS count
FROM videos
WHERE category IS NOT NULL
GROUP BY category
ORDER BY count DESC, category ASC
"#;

const TRENDING_HASHTAGS_SQL: &str = r#"
SELECT h.id, h.name, COUNT(vh.video_id) AS video_count
FROM hashtags h
JOIN video_hashtags vh ON vh.hashtag_id = h.id
GROUP BY h.id, h.name
ORDER BY video_count DESC, h.name ASC
LIMIT $1
"#;

/// Diesel-backed implementation of the video repository port.
#[derive(Clone)]
pub struct DieselVideoRepository {
    pool: DbPool,
}

impl DieselVideoRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VideoPersistenceError {
    map_basic_pool_error(error, VideoPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> VideoPersistenceError {
    map_basic_diesel_error(
        error,
        VideoPersistenceError::query,
        VideoPersistenceError::connection,
    )
}

fn corrupt(what: &str, err: impl std::fmt::Display) -> VideoPersistenceError {
    VideoPersistenceError::query(format!("invalid {what} row: {err}"))
}

fn to_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn row_to_video(row: VideoRow) -> Result<Video, VideoPersistenceError> {
    Ok(Video {
        id: VideoId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        url: row.url,
        description: VideoDescription::parse_optional(row.description.as_deref())
            .map_err(|err| corrupt("video", err))?,
        category: Category::parse_optional(row.category.as_deref())
            .map_err(|err| corrupt("video", err))?,
        views: row.views,
        created_at: row.created_at,
    })
}

fn row_to_like(row: LikeRow) -> Like {
    Like {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        video_id: VideoId::from_uuid(row.video_id),
        created_at: row.created_at,
    }
}

fn row_to_comment(row: CommentRow) -> Result<Comment, VideoPersistenceError> {
    Ok(Comment {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        video_id: VideoId::from_uuid(row.video_id),
        text: CommentText::new(&row.text).map_err(|err| corrupt("comment", err))?,
        created_at: row.created_at,
    })
}

/// Attach authors, hashtags, likes and comments to a page of videos,
/// preserving the page order.
async fn assemble_feed(
    conn: &mut AsyncPgConnection,
    rows: Vec<VideoRow>,
) -> Result<Vec<FeedVideo>, VideoPersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let video_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let author_ids: Vec<Uuid> = rows.iter().map(|row| row.user_id).collect();

    let authors: HashMap<Uuid, UserSummary> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select((users::id, users::username, users::image))
        .load::<(Uuid, String, Option<String>)>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|(id, username, image)| {
            let username = Username::new(&username).map_err(|err| corrupt("user", err))?;
            Ok((
                id,
                UserSummary {
                    id: UserId::from_uuid(id),
                    username,
                    image,
                },
            ))
        })
        .collect::<Result<_, VideoPersistenceError>>()?;

    let mut tags: HashMap<Uuid, Vec<HashtagName>> = HashMap::new();
    for (video_id, name) in video_hashtags::table
        .inner_join(hashtags::table)
        .filter(video_hashtags::video_id.eq_any(&video_ids))
        .order(hashtags::name.asc())
        .select((video_hashtags::video_id, hashtags::name))
        .load::<(Uuid, String)>(conn)
        .await
        .map_err(map_diesel_error)?
    {
        let name = HashtagName::new(&name).map_err(|err| corrupt("hashtag", err))?;
        tags.entry(video_id).or_default().push(name);
    }

    let mut video_likes: HashMap<Uuid, Vec<Like>> = HashMap::new();
    for row in likes::table
        .filter(likes::video_id.eq_any(&video_ids))
        .order(likes::created_at.asc())
        .select(LikeRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?
    {
        video_likes.entry(row.video_id).or_default().push(row_to_like(row));
    }

    let mut video_comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for row in comments::table
        .filter(comments::video_id.eq_any(&video_ids))
        .order(comments::created_at.desc())
        .select(CommentRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?
    {
        video_comments
            .entry(row.video_id)
            .or_default()
            .push(row_to_comment(row)?);
    }

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            let user = authors
                .get(&row.user_id)
                .cloned()
                .ok_or_else(|| corrupt("video", format!("author of {id} missing")))?;
            Ok(FeedVideo {
                video: row_to_video(row)?,
                user,
                hashtags: tags.remove(&id).unwrap_or_default(),
                likes: video_likes.remove(&id).unwrap_or_default(),
                comments: video_comments.remove(&id).unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait]
impl VideoRepository for DieselVideoRepository {
    async fn insert_with_hashtags(&self, video: &NewVideo) -> Result<Video, VideoPersistenceError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewVideoRow {
            id: *video.id.as_uuid(),
            user_id: *video.owner.as_uuid(),
            url: &video.url,
            description: video.description.as_ref().map(AsRef::as_ref),
            category: video.category.as_ref().map(AsRef::as_ref),
            created_at: video.created_at,
        };

        // The video and its hashtag links land together or not at all.
        let inserted: VideoRow = conn
            .transaction(|conn| {
                async move {
                    let inserted: VideoRow = diesel::insert_into(videos::table)
                        .values(&row)
                        .returning(VideoRow::as_returning())
                        .get_result(conn)
                        .await?;

                    for name in &video.hashtags {
                        let hashtag_id: Uuid = diesel::insert_into(hashtags::table)
                            .values(&NewHashtagRow {
                                id: Uuid::new_v4(),
                                name: name.as_ref(),
                            })
                            .on_conflict(hashtags::name)
                            .do_update()
                            .set(hashtags::name.eq(excluded(hashtags::name)))
                            .returning(hashtags::id)
                            .get_result(conn)
                            .await?;
                        diesel::insert_into(video_hashtags::table)
                            .values(&VideoHashtagRow {
                                video_id: inserted.id,
                                hashtag_id,
                            })
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .await?;
                    }

                    Ok::<_, diesel::result::Error>(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_video(inserted)
    }

    async fn list_feed(
        &self,
        filter: &FeedFilter,
        limit: usize,
    ) -> Result<Vec<FeedVideo>, VideoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = videos::table.into_boxed();
        if let Some(category) = &filter.category {
            query = query.filter(videos::category.eq(category.as_ref().to_owned()));
        }
        if let Some(hashtag) = &filter.hashtag {
            let tagged = video_hashtags::table
                .inner_join(hashtags::table)
                .filter(hashtags::name.eq(hashtag.as_ref().to_owned()))
                .select(video_hashtags::video_id);
            query = query.filter(videos::id.eq_any(tagged));
        }
        let rows = query
            .order((videos::created_at.desc(), videos::id.desc()))
            .limit(to_limit(limit))
            .select(VideoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        assemble_feed(&mut conn, rows).await
    }

    async fn list_recommended(&self, limit: usize) -> Result<Vec<FeedVideo>, VideoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = videos::table
            .order((videos::created_at.desc(), videos::views.desc()))
            .limit(to_limit(limit))
            .select(VideoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        assemble_feed(&mut conn, rows).await
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, VideoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryCountRow> = sql_query(CATEGORY_COUNTS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| CategoryCount {
                category: row.category,
                count: row.count,
            })
            .collect())
    }

    async fn trending_hashtags(
        &self,
        limit: usize,
    ) -> Result<Vec<TrendingHashtag>, VideoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TrendingHashtagRow> = sql_query(TRENDING_HASHTAGS_SQL)
            .bind::<BigInt, _>(to_limit(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                Ok(TrendingHashtag {
                    id: row.id,
                    name: HashtagName::new(&row.name).map_err(|err| corrupt("hashtag", err))?,
                    video_count: row.video_count,
                })
            })
            .collect()
    }

    async fn exists(&self, id: &VideoId) -> Result<bool, VideoPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(videos::table.find(*id.as_uuid())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
