//! Reqwest-backed upload service adapter.
//!
//! Owns transport details only: the authenticated POST and DELETE, timeout
//! and status mapping, and decoding the `{"url": ...}` acknowledgement.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::warn;

use super::join_url;
use crate::domain::ports::{VideoBlob, VideoStorage, VideoStorageError};

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct UploadAckDto {
    url: String,
}

/// Storage adapter that POSTs the raw file to `{endpoint}/{object_key}`.
pub struct HttpVideoStorage {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpVideoStorage {
    /// Build an adapter with an explicit request timeout.
    ///
    /// `token`, when present, is sent as a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    fn target(&self, blob: &VideoBlob) -> Result<Url, VideoStorageError> {
        let raw = join_url(self.endpoint.as_str(), &blob.object_key());
        Url::parse(&raw)
            .map_err(|err| VideoStorageError::rejected(format!("invalid upload target: {err}")))
    }
}

#[async_trait]
impl VideoStorage for HttpVideoStorage {
    async fn store(&self, blob: &VideoBlob) -> Result<String, VideoStorageError> {
        let mut request = self
            .client
            .post(self.target(blob)?)
            .header(reqwest::header::CONTENT_TYPE, blob.content_type.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .body(blob.bytes.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_ack(body.as_ref())
    }

    async fn discard(&self, blob: &VideoBlob) -> Result<(), VideoStorageError> {
        let mut request = self.client.delete(self.target(blob)?);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn parse_ack(body: &[u8]) -> Result<String, VideoStorageError> {
    let ack: UploadAckDto = serde_json::from_slice(body).map_err(|err| {
        VideoStorageError::rejected(format!("invalid upload acknowledgement: {err}"))
    })?;
    if ack.url.trim().is_empty() {
        return Err(VideoStorageError::rejected(
            "upload acknowledgement carried an empty url",
        ));
    }
    Ok(ack.url)
}

fn map_transport_error(error: reqwest::Error) -> VideoStorageError {
    if error.is_timeout() {
        return VideoStorageError::connection(format!("upload timed out: {error}"));
    }
    if error.is_connect() || error.is_request() {
        return VideoStorageError::connection(error.to_string());
    }
    VideoStorageError::rejected(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> VideoStorageError {
    let snippet: String = String::from_utf8_lossy(body)
        .chars()
        .take(MAX_ERROR_BODY_CHARS)
        .collect();
    warn!(%status, body = %snippet, "upload service refused file");
    if status.is_server_error() {
        VideoStorageError::connection(format!("upload service returned {status}"))
    } else {
        VideoStorageError::rejected(format!("upload service returned {status}"))
    }
}
