//! Driven port for storing uploaded video files.
use async_trait::async_trait;

use crate::domain::{UserId, VideoId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by video storage adapters.
    pub enum VideoStorageError {
        /// Storage backend could not be reached.
        Connection { message: String } => "video storage unreachable: {message}",
        /// Storage backend refused or failed to persist the file.
        Rejected { message: String } => "video storage rejected upload: {message}",
    }
}

/// Video file handed to a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoBlob {
    pub video_id: VideoId,
    pub owner: UserId,
    /// File name supplied by the client, used only to pick an extension.
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl VideoBlob {
    /// Storage key of the form `{owner}/{video_id}.{ext}`.
    pub fn object_key(&self) -> String {
        let extension = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| extension_for(&self.content_type).to_owned());
        format!("{}/{}.{extension}", self.owner, self.video_id)
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "video/ogg" => "ogv",
        _ => "mp4",
    }
}

/// Port for persisting video files and returning their public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoStorage: Send + Sync {
    /// Store the file and return the URL clients should play it from.
    async fn store(&self, blob: &VideoBlob) -> Result<String, VideoStorageError>;

    /// Remove a previously stored file. Removing a missing file succeeds.
    async fn discard(&self, blob: &VideoBlob) -> Result<(), VideoStorageError>;
}
