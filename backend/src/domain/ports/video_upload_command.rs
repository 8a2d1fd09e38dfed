//! Driving port for publishing a video.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Category, Error, HashtagName, UPLOAD_MAX_BYTES, UserId, Video, VideoDescription, VideoId,
};

/// Parsed upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub owner: UserId,
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub description: Option<VideoDescription>,
    pub category: Option<Category>,
    pub hashtags: Vec<HashtagName>,
}

/// Domain use-case port for uploads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoUploadCommand: Send + Sync {
    /// Store the file, then record the video and its hashtags.
    async fn upload(&self, request: UploadRequest) -> Result<Video, Error>;

    /// Largest video file accepted, in bytes.
    fn max_bytes(&self) -> usize;
}

/// Fixture command that pretends every file lands on a fixed CDN.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVideoUploadCommand;

#[async_trait]
impl VideoUploadCommand for FixtureVideoUploadCommand {
    async fn upload(&self, request: UploadRequest) -> Result<Video, Error> {
        let id = VideoId::random();
        Ok(Video {
            id,
            user_id: request.owner,
            url: format!("https://cdn.invalid/{id}"),
            description: request.description,
            category: request.category,
            views: 0,
            created_at: Utc::now(),
        })
    }

    fn max_bytes(&self) -> usize {
        UPLOAD_MAX_BYTES
    }
}
