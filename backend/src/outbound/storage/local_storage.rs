//! Local media directory adapter used in development.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use super::join_url;
use crate::domain::ports::{VideoBlob, VideoStorage, VideoStorageError};

/// Writes uploads beneath a media directory and serves them from
/// `media_base_url`. The directory handle confines writes to that root.
#[derive(Clone)]
pub struct LocalVideoStorage {
    root: Arc<Dir>,
    root_path: PathBuf,
    base_url: String,
}

impl LocalVideoStorage {
    /// Open (creating if needed) the media directory.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(media_dir: impl AsRef<Path>, base_url: impl Into<String>) -> io::Result<Self> {
        let media_dir = media_dir.as_ref();
        Dir::create_ambient_dir_all(media_dir, ambient_authority())?;
        let root = Dir::open_ambient_dir(media_dir, ambient_authority())?;
        Ok(Self {
            root: Arc::new(root),
            root_path: media_dir.to_path_buf(),
            base_url: base_url.into(),
        })
    }
}

fn write_blob(root: &Dir, key: &str, bytes: &[u8]) -> io::Result<()> {
    if let Some((parent, _)) = key.rsplit_once('/') {
        root.create_dir_all(parent)?;
    }
    root.write(key, bytes)
}

fn remove_blob(root: &Dir, key: &str) -> io::Result<()> {
    match root.remove_file(key) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[async_trait]
impl VideoStorage for LocalVideoStorage {
    async fn store(&self, blob: &VideoBlob) -> Result<String, VideoStorageError> {
        let key = blob.object_key();
        let root = Arc::clone(&self.root);
        let bytes = blob.bytes.clone();
        let write_key = key.clone();
        tokio::task::spawn_blocking(move || write_blob(&root, &write_key, &bytes))
            .await
            .map_err(|err| VideoStorageError::rejected(format!("write task failed: {err}")))?
            .map_err(|err| {
                VideoStorageError::rejected(format!(
                    "failed to write {}: {err}",
                    self.root_path.join(&key).display()
                ))
            })?;
        debug!(key = %key, size = blob.bytes.len(), "stored video locally");
        Ok(join_url(&self.base_url, &key))
    }

    async fn discard(&self, blob: &VideoBlob) -> Result<(), VideoStorageError> {
        let key = blob.object_key();
        let root = Arc::clone(&self.root);
        let remove_key = key.clone();
        tokio::task::spawn_blocking(move || remove_blob(&root, &remove_key))
            .await
            .map_err(|err| VideoStorageError::rejected(format!("remove task failed: {err}")))?
            .map_err(|err| VideoStorageError::rejected(format!("failed to remove {key}: {err}")))?;
        debug!(key = %key, "discarded local video");
        Ok(())
    }
}
