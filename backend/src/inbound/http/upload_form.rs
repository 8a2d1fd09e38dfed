//! Streaming reader for the multipart upload form.

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::StreamExt;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::UploadRequest;
use crate::domain::{Category, Error, HashtagName, UserId, VideoDescription};

/// Cap on each text field; the description limit is far below this.
const TEXT_FIELD_MAX_BYTES: usize = 64 * 1024;

/// Raw upload form as read off the wire.
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    file_name: Option<String>,
    content_type: Option<String>,
    video: Option<Vec<u8>>,
    description: Option<String>,
    category: Option<String>,
    hashtags: Option<String>,
}

fn invalid(field: &str) -> Error {
    Error::invalid_request("Invalid request").with_details(json!({ "field": field }))
}

fn read_error(error: &MultipartError) -> Error {
    debug!(%error, "malformed multipart body");
    Error::invalid_request("Invalid request")
}

async fn read_capped(field: &mut Field, max_bytes: usize, too_large: Error) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| read_error(&err))?;
        if buffer.len() + chunk.len() > max_bytes {
            return Err(too_large);
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, Error> {
    let bytes = read_capped(field, TEXT_FIELD_MAX_BYTES, invalid(name)).await?;
    String::from_utf8(bytes).map_err(|_| invalid(name))
}

impl UploadForm {
    /// Drain `payload`, keeping the known fields and skipping the rest.
    ///
    /// The video part is refused with `413` as soon as it exceeds
    /// `max_video_bytes`, without buffering the remainder.
    pub(crate) async fn read(mut payload: Multipart, max_video_bytes: usize) -> Result<Self, Error> {
        let mut form = Self::default();
        while let Some(item) = payload.next().await {
            let mut field = item.map_err(|err| read_error(&err))?;
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "video" => {
                    form.file_name = field
                        .content_disposition()
                        .and_then(|cd| cd.get_filename())
                        .map(str::to_owned);
                    form.content_type = field.content_type().map(|mime| mime.essence_str().to_owned());
                    let too_large = Error::payload_too_large("Upload too large")
                        .with_details(json!({ "maxBytes": max_video_bytes }));
                    form.video = Some(read_capped(&mut field, max_video_bytes, too_large).await?);
                }
                "description" => form.description = Some(read_text(&mut field, "description").await?),
                "category" => form.category = Some(read_text(&mut field, "category").await?),
                "hashtags" => form.hashtags = Some(read_text(&mut field, "hashtags").await?),
                _ => {
                    // Unknown parts are drained so the stream can advance.
                    while let Some(chunk) = field.next().await {
                        chunk.map_err(|err| read_error(&err))?;
                    }
                }
            }
        }
        Ok(form)
    }

    /// Validate the form into a domain upload request.
    pub(crate) fn into_request(self, owner: UserId) -> Result<UploadRequest, Error> {
        let bytes = self.video.ok_or_else(|| invalid("video"))?;
        let content_type = self.content_type.ok_or_else(|| invalid("video"))?;
        let description = VideoDescription::parse_optional(self.description.as_deref())
            .map_err(|_| invalid("description"))?;
        let category =
            Category::parse_optional(self.category.as_deref()).map_err(|_| invalid("category"))?;
        let hashtags = parse_hashtags(self.hashtags.as_deref())?;
        Ok(UploadRequest {
            owner,
            file_name: self.file_name,
            content_type,
            bytes,
            description,
            category,
            hashtags,
        })
    }
}

/// Parse the `hashtags` field: a JSON array of strings, absent or blank
/// meaning none.
fn parse_hashtags(raw: Option<&str>) -> Result<Vec<HashtagName>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(Vec::new());
    };
    let tokens: Vec<String> = serde_json::from_str(raw).map_err(|_| invalid("hashtags"))?;
    HashtagName::parse_list(tokens).map_err(|_| invalid("hashtags"))
}
