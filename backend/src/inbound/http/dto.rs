//! Wire types for the `/api` resource.
//!
//! Requests mirror the loosely typed form the web client sends: every field is
//! optional and validated by the handler, so a missing value becomes a `400`
//! with the usual error envelope rather than a framework rejection.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::User;

/// Query string accepted by `GET /api` and `POST /api?type=upload`.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ApiQuery {
    /// Operation selector, e.g. `feed` or `trending-hashtags`.
    #[serde(rename = "type")]
    #[param(rename = "type", example = "feed")]
    pub request_type: Option<String>,
    /// Feed filter: exact category.
    pub category: Option<String>,
    /// Feed filter: hashtag, with or without the leading `#`.
    pub hashtag: Option<String>,
    /// Target of `like` and `comment`.
    pub video_id: Option<String>,
    /// Comment body.
    pub text: Option<String>,
    /// Size of the recommended list.
    pub limit: Option<String>,
}

/// JSON body accepted by `POST /api`.
///
/// Example JSON:
/// `{"type":"login","email":"ada@example.com","password":"hunter22"}`
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// `register`, `login` or `logout`.
    #[serde(rename = "type")]
    #[schema(example = "login")]
    pub request_type: Option<String>,
    pub email: Option<String>,
    /// Required for `register` only.
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response wrapping a single account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: User,
}

/// Response to `logout`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Multipart form accepted by `POST /api?type=upload` (documentation only).
#[derive(Debug, ToSchema)]
pub struct UploadFormSchema {
    /// Video file; its part must carry a `video/*` content type.
    #[schema(value_type = String, format = Binary)]
    pub video: Vec<u8>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// JSON array of hashtag strings, e.g. `["#fun","dance"]`.
    #[schema(example = "[\"#fun\",\"dance\"]")]
    pub hashtags: Option<String>,
}
