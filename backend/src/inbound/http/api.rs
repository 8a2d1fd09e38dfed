//! The single `/api` resource the web client talks to.
//!
//! ```text
//! GET  /api?type=feed&category=dance
//! GET  /api?type=like&videoId=...
//! POST /api {"type":"login","email":"ada@example.com","password":"hunter22"}
//! POST /api?type=upload  (multipart/form-data)
//! ```
//!
//! Operations are selected by `type`, from the query string for `GET` and
//! uploads and from the JSON body for the account operations.

use actix_multipart::Multipart;
use actix_web::guard::{self, GuardContext};
use actix_web::http::header;
use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::debug;

use super::dto::{ApiQuery, AuthRequest, LogoutResponse, UploadFormSchema, UserEnvelope};
use super::session::SessionContext;
use super::state::HttpState;
use super::upload_form::UploadForm;
use super::ApiResult;
use crate::domain::{
    AuthValidationError, Category, CommentText, Error, FeedFilter, FeedVideo, HashtagName,
    LoginCredentials, RecommendedLimit, Registration, UserValidationError, VideoId,
};

const INVALID_REQUEST: &str = "Invalid request";
const INVALID_REQUEST_TYPE: &str = "Invalid request type";

/// Register the `/api` resource.
///
/// Multipart posts are routed to the upload handler; every other post is
/// treated as a JSON account request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use clipstream::inbound::http::api;
///
/// let app = App::new().configure(api::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api")
            .app_data(json_config())
            .app_data(query_config())
            .route(web::get().to(api_get))
            .route(web::post().guard(guard::fn_guard(is_multipart)).to(api_upload))
            .route(web::post().to(api_post)),
    );
}

fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected JSON body");
        Error::invalid_request(INVALID_REQUEST).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected query string");
        Error::invalid_request(INVALID_REQUEST).into()
    })
}

fn invalid_field(field: &str, code: &str) -> Error {
    Error::invalid_request(INVALID_REQUEST).with_details(json!({ "field": field, "code": code }))
}

fn map_auth_validation_error(err: &AuthValidationError) -> Error {
    let (field, code) = match err {
        AuthValidationError::User(UserValidationError::EmptyEmail) => ("email", "empty_email"),
        AuthValidationError::User(UserValidationError::InvalidEmail) => ("email", "invalid_email"),
        AuthValidationError::User(UserValidationError::EmptyUsername) => {
            ("username", "empty_username")
        }
        AuthValidationError::User(UserValidationError::UsernameTooShort { .. }) => {
            ("username", "username_too_short")
        }
        AuthValidationError::User(UserValidationError::UsernameTooLong { .. }) => {
            ("username", "username_too_long")
        }
        AuthValidationError::User(UserValidationError::UsernameInvalidCharacters) => {
            ("username", "username_invalid_characters")
        }
        AuthValidationError::User(UserValidationError::EmptyId | UserValidationError::InvalidId) => {
            ("id", "invalid_id")
        }
        AuthValidationError::EmptyPassword => ("password", "empty_password"),
        AuthValidationError::PasswordTooShort => ("password", "password_too_short"),
        AuthValidationError::PasswordTooLong => ("password", "password_too_long"),
    };
    debug!(field, code, "rejected account payload");
    invalid_field(field, code)
}

fn parse_video_id(raw: Option<&str>) -> Result<VideoId, Error> {
    raw.ok_or_else(|| invalid_field("videoId", "missing"))
        .and_then(|value| VideoId::new(value).map_err(|_| invalid_field("videoId", "invalid_id")))
}

fn parse_feed_filter(query: &ApiQuery) -> Result<FeedFilter, Error> {
    let category = Category::parse_optional(query.category.as_deref())
        .map_err(|_| invalid_field("category", "too_long"))?;
    let hashtag = match query.hashtag.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            HashtagName::new(raw).map_err(|_| invalid_field("hashtag", "invalid_hashtag"))?,
        ),
    };
    Ok(FeedFilter { category, hashtag })
}

fn parse_limit(raw: Option<&str>) -> Result<RecommendedLimit, Error> {
    let requested = match raw.map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(
            value
                .parse::<i64>()
                .map_err(|_| invalid_field("limit", "invalid_number"))?,
        ),
    };
    Ok(RecommendedLimit::clamped(requested))
}

/// Read-only views and engagement actions selected by `type`.
///
/// `like` and `comment` need a session; the other views are public.
#[utoipa::path(
    get,
    path = "/api",
    params(ApiQuery),
    responses(
        (status = 200, description = "Depends on `type`: `feed` and `recommended` return \
            `FeedVideo` arrays, `categories` a `CategoryCount` array, `trending-hashtags` a \
            `TrendingHashtag` array, `like` a `Like`, `comment` a `Comment` and `session` a \
            `UserEnvelope`", body = [FeedVideo]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Video not found", body = Error),
        (status = 409, description = "Already liked", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["api"],
    operation_id = "apiGet"
)]
pub async fn api_get(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ApiQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    match query.request_type.as_deref() {
        Some("feed") => {
            let filter = parse_feed_filter(&query)?;
            Ok(HttpResponse::Ok().json(state.feed.feed(&filter).await?))
        }
        Some("recommended") => {
            let limit = parse_limit(query.limit.as_deref())?;
            Ok(HttpResponse::Ok().json(state.feed.recommended(limit).await?))
        }
        Some("categories") => Ok(HttpResponse::Ok().json(state.feed.categories().await?)),
        Some("trending-hashtags") => {
            Ok(HttpResponse::Ok().json(state.feed.trending_hashtags().await?))
        }
        Some("like") => {
            let user_id = session.require_user_id()?;
            let video_id = parse_video_id(query.video_id.as_deref())?;
            Ok(HttpResponse::Ok().json(state.engagement.like(&user_id, &video_id).await?))
        }
        Some("comment") => {
            let user_id = session.require_user_id()?;
            let video_id = parse_video_id(query.video_id.as_deref())?;
            let text = CommentText::new(query.text.as_deref().unwrap_or_default())
                .map_err(|_| invalid_field("text", "invalid_comment"))?;
            let comment = state.engagement.comment(&user_id, &video_id, text).await?;
            Ok(HttpResponse::Ok().json(comment))
        }
        Some("session") => {
            let user_id = session.require_user_id()?;
            let user = state.profile.fetch_profile(&user_id).await?;
            Ok(HttpResponse::Ok().json(UserEnvelope { user }))
        }
        _ => Err(Error::invalid_request(INVALID_REQUEST_TYPE)),
    }
}

/// Account operations: `register`, `login` and `logout`.
///
/// A successful login renews the session cookie. Multipart bodies sent with
/// `?type=upload` are served by [`api_upload`] and documented here because
/// both share the `POST /api` operation.
#[utoipa::path(
    post,
    path = "/api",
    params(("type" = Option<String>, Query, description = "`upload` for multipart uploads")),
    request_body(content(
        (AuthRequest = "application/json"),
        (UploadFormSchema = "multipart/form-data")
    )),
    responses(
        (status = 200, description = "`UserEnvelope` for register and login, \
            `LogoutResponse` for logout, `Video` for upload", body = UserEnvelope,
            headers(("Set-Cookie" = String, description = "Session cookie on login"))),
        (status = 400, description = "Invalid request or user exists", body = Error),
        (status = 401, description = "Invalid credentials or missing session", body = Error),
        (status = 413, description = "Upload too large", body = Error),
        (status = 500, description = "Internal server error or upload failed", body = Error)
    ),
    tags = ["api"],
    operation_id = "apiPost",
    security((), ("SessionCookie" = []))
)]
pub async fn api_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AuthRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    match request.request_type.as_deref() {
        Some("register") => {
            let registration = Registration::try_from_parts(
                request.email.as_deref().unwrap_or_default(),
                request.username.as_deref().unwrap_or_default(),
                request.password.as_deref().unwrap_or_default(),
            )
            .map_err(|err| map_auth_validation_error(&err))?;
            let user = state.registration.register(&registration).await?;
            Ok(HttpResponse::Ok().json(UserEnvelope { user }))
        }
        Some("login") => {
            let credentials = LoginCredentials::try_from_parts(
                request.email.as_deref().unwrap_or_default(),
                request.password.as_deref().unwrap_or_default(),
            )
            .map_err(|err| map_auth_validation_error(&err))?;
            let user = state.login.authenticate(&credentials).await?;
            session.persist_user(&user.id)?;
            Ok(HttpResponse::Ok().json(UserEnvelope { user }))
        }
        Some("logout") => {
            session.clear();
            Ok(HttpResponse::Ok().json(LogoutResponse { success: true }))
        }
        _ => Err(Error::invalid_request(INVALID_REQUEST_TYPE)),
    }
}

/// Upload a video with optional description, category and hashtags.
pub async fn api_upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ApiQuery>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    if query.request_type.as_deref() != Some("upload") {
        return Err(Error::invalid_request(INVALID_REQUEST_TYPE));
    }
    let owner = session.require_user_id()?;
    let request = UploadForm::read(payload, state.uploads.max_bytes())
        .await?
        .into_request(owner)?;
    let video = state.uploads.upload(request).await?;
    Ok(HttpResponse::Ok().json(video))
}
