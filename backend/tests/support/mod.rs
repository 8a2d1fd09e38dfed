//! Shared harness: a full `/api` app over the in-memory adapters.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use clipstream::Trace;
use clipstream::domain::{
    AccountService, EngagementService, FeedService, UPLOAD_MAX_BYTES, UploadService,
};
use clipstream::inbound::http::api;
use clipstream::inbound::http::state::HttpState;
use clipstream::outbound::{Argon2Hasher, InMemoryStore, LocalVideoStorage};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const MEDIA_BASE_URL: &str = "http://media.test/files";

/// Keeps the media directory alive for the duration of a test.
pub struct Harness {
    pub state: HttpState,
    pub media: TempDir,
}

pub fn harness() -> Harness {
    harness_with_upload_cap(UPLOAD_MAX_BYTES)
}

/// Harness whose upload service refuses files larger than `max_bytes`.
pub fn harness_with_upload_cap(max_bytes: usize) -> Harness {
    let media = tempfile::tempdir().expect("media dir");
    let storage = Arc::new(LocalVideoStorage::open(media.path(), MEDIA_BASE_URL).expect("storage"));
    let store = Arc::new(InMemoryStore::default());
    let params = argon2::Params::new(8, 1, 1, None).expect("argon2 params");
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        Arc::new(Argon2Hasher::with_params(params)),
    ));
    let state = HttpState {
        login: accounts.clone(),
        registration: accounts.clone(),
        profile: accounts,
        feed: Arc::new(FeedService::new(store.clone())),
        engagement: Arc::new(EngagementService::new(store.clone(), store.clone())),
        uploads: Arc::new(UploadService::new(storage, store).with_max_bytes(max_bytes)),
    };
    Harness { state, media }
}

pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(session)
            .wrap(Trace)
            .configure(api::configure),
    )
    .await
}

pub fn session_cookie(res: &ServiceResponse<BoxBody>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

pub async fn body_json(res: ServiceResponse<BoxBody>) -> Value {
    test::read_body_json(res).await
}

pub fn account_request(kind: &str, email: &str, username: &str, password: &str) -> Request {
    test::TestRequest::post()
        .uri("/api")
        .set_json(json!({
            "type": kind,
            "email": email,
            "username": username,
            "password": password,
        }))
        .to_request()
}

pub const BOUNDARY: &str = "clipstream-it-boundary";

/// Encode a multipart body with an optional video part and text fields.
pub fn multipart_body(video: Option<(&str, &str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = video {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"video\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(cookie: Option<&Cookie<'static>>, body: Vec<u8>) -> Request {
    let mut req = test::TestRequest::post()
        .uri("/api?type=upload")
        .insert_header((
            actix_web::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    req.to_request()
}

pub fn get_request(uri: &str, cookie: Option<&Cookie<'static>>) -> Request {
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    req.to_request()
}
