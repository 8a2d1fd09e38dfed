//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` and `username` are unique.
    users (id) {
        id -> Uuid,
        /// Normalised to lower case by the domain before insert.
        email -> Varchar,
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        image -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Uploaded videos.
    videos (id) {
        id -> Uuid,
        user_id -> Uuid,
        url -> Text,
        description -> Nullable<Text>,
        category -> Nullable<Varchar>,
        views -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hashtag names without the leading `#`; `name` is unique.
    hashtags (id) {
        id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Many-to-many link between videos and hashtags.
    video_hashtags (video_id, hashtag_id) {
        video_id -> Uuid,
        hashtag_id -> Uuid,
    }
}

diesel::table! {
    /// One row per (user, video) like.
    likes (id) {
        id -> Uuid,
        user_id -> Uuid,
        video_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        user_id -> Uuid,
        video_id -> Uuid,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(videos -> users (user_id));
diesel::joinable!(video_hashtags -> videos (video_id));
diesel::joinable!(video_hashtags -> hashtags (hashtag_id));
diesel::joinable!(likes -> videos (video_id));
diesel::joinable!(comments -> videos (video_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    videos,
    hashtags,
    video_hashtags,
    likes,
    comments,
);
