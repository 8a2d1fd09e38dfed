//! Upload domain service: store the file, then record the video.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::ports::{
    UploadRequest, VideoBlob, VideoRepository, VideoStorage, VideoUploadCommand,
};
use crate::domain::{Error, NewVideo, Video, VideoId};

/// Largest accepted video file, 64 MiB.
pub const UPLOAD_MAX_BYTES: usize = 64 * 1024 * 1024;

const UPLOAD_FAILED: &str = "Upload failed";

/// Service implementing [`VideoUploadCommand`].
#[derive(Clone)]
pub struct UploadService<S: ?Sized, V> {
    storage: Arc<S>,
    videos: Arc<V>,
    max_bytes: usize,
}

impl<S: ?Sized, V> UploadService<S, V> {
    /// Create a new service with the default size cap.
    pub fn new(storage: Arc<S>, videos: Arc<V>) -> Self {
        Self {
            storage,
            videos,
            max_bytes: UPLOAD_MAX_BYTES,
        }
    }

    /// Override the size cap.
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl<S, V> UploadService<S, V>
where
    S: VideoStorage + ?Sized,
{
    /// Best-effort removal of a file whose video row was never written.
    async fn discard_orphan(&self, blob: &VideoBlob) {
        if let Err(err) = self.storage.discard(blob).await {
            warn!(
                error = %err,
                object_key = %blob.object_key(),
                "orphaned video file left in storage"
            );
        }
    }
}

#[async_trait]
impl<S, V> VideoUploadCommand for UploadService<S, V>
where
    S: VideoStorage + ?Sized,
    V: VideoRepository,
{
    async fn upload(&self, request: UploadRequest) -> Result<Video, Error> {
        if !request.content_type.starts_with("video/") || request.bytes.is_empty() {
            return Err(Error::invalid_request("Invalid request"));
        }
        if request.bytes.len() > self.max_bytes {
            return Err(Error::payload_too_large("Upload too large"));
        }

        let blob = VideoBlob {
            video_id: VideoId::random(),
            owner: request.owner,
            file_name: request.file_name,
            content_type: request.content_type,
            bytes: request.bytes,
        };
        let url = self.storage.store(&blob).await.map_err(|err| {
            error!(error = %err, video_id = %blob.video_id, "video storage failed");
            Error::internal_public(UPLOAD_FAILED)
        })?;

        let new_video = NewVideo {
            id: blob.video_id,
            owner: blob.owner,
            url,
            description: request.description,
            category: request.category,
            hashtags: request.hashtags,
            created_at: Utc::now(),
        };
        let video = match self.videos.insert_with_hashtags(&new_video).await {
            Ok(video) => video,
            Err(err) => {
                error!(error = %err, video_id = %new_video.id, "recording upload failed");
                self.discard_orphan(&blob).await;
                return Err(Error::internal_public(UPLOAD_FAILED));
            }
        };

        info!(video_id = %video.id, user_id = %video.user_id, "video uploaded");
        Ok(video)
    }

    fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}
