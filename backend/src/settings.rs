//! Application settings loaded via OrthoConfig.
//!
//! Every value may come from `CLIPSTREAM_*` environment variables or the
//! matching command-line flag. Unset values fall back to development
//! defaults through the accessor methods.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MEDIA_DIR: &str = "media";
const DEFAULT_MEDIA_BASE_URL: &str = "http://localhost:8080/media";

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLIPSTREAM")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. When absent the in-memory store is used.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Base URL of the managed upload service.
    pub upload_endpoint: Option<String>,
    /// Bearer token presented to the upload service.
    pub upload_token: Option<String>,
    /// Per-request timeout for the upload service.
    pub upload_timeout_secs: Option<u64>,
    /// Directory receiving uploads when no upload service is configured.
    pub media_dir: Option<PathBuf>,
    /// Public URL prefix under which `media_dir` is served.
    pub media_base_url: Option<String>,
}

/// Where uploaded videos are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// Managed upload service reached over HTTP.
    Http {
        endpoint: Url,
        token: Option<String>,
        timeout: Duration,
    },
    /// Local directory, for development.
    Local { media_dir: PathBuf, base_url: String },
}

/// Settings that parse but cannot be used.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid upload endpoint '{value}': {reason}")]
    UploadEndpoint { value: String, reason: String },
}

impl AppSettings {
    /// Listen address, `0.0.0.0:8080` by default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR))
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(
            self.upload_timeout_secs
                .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// Resolve the video storage backend.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UploadEndpoint`] when the endpoint is not an
    /// absolute http(s) URL.
    pub fn storage_target(&self) -> Result<StorageTarget, SettingsError> {
        let endpoint = self
            .upload_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        match endpoint {
            Some(raw) => {
                let endpoint = Url::parse(raw).map_err(|err| SettingsError::UploadEndpoint {
                    value: raw.to_owned(),
                    reason: err.to_string(),
                })?;
                if !matches!(endpoint.scheme(), "http" | "https") {
                    return Err(SettingsError::UploadEndpoint {
                        value: raw.to_owned(),
                        reason: "scheme must be http or https".to_owned(),
                    });
                }
                Ok(StorageTarget::Http {
                    endpoint,
                    token: self.upload_token.clone().filter(|token| !token.is_empty()),
                    timeout: self.upload_timeout(),
                })
            }
            None => Ok(StorageTarget::Local {
                media_dir: self
                    .media_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_DIR)),
                base_url: self
                    .media_base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MEDIA_BASE_URL.to_owned()),
            }),
        }
    }
}
