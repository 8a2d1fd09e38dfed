//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::time::Duration;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use clipstream::Trace;
#[cfg(debug_assertions)]
use clipstream::doc::ApiDoc;
use clipstream::inbound::http::api;
use clipstream::inbound::http::health::{HealthState, live, ready};
use clipstream::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    session_ttl: Duration,
}

fn session_ttl(ttl: Duration) -> actix_web::cookie::time::Duration {
    actix_web::cookie::time::Duration::seconds(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        session_ttl: ttl,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(session_ttl(ttl)))
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .configure(api::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        session_ttl,
        bind_addr,
        storage: _,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            session_ttl,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use async_trait::async_trait;
    use clipstream::domain::ports::{VideoBlob, VideoStorage, VideoStorageError};
    use rstest::rstest;
    use serde_json::{Value, json};

    struct RefusingStorage;

    #[async_trait]
    impl VideoStorage for RefusingStorage {
        async fn store(&self, _blob: &VideoBlob) -> Result<String, VideoStorageError> {
            Err(VideoStorageError::rejected("read-only"))
        }

        async fn discard(&self, _blob: &VideoBlob) -> Result<(), VideoStorageError> {
            Ok(())
        }
    }

    fn deps() -> AppDependencies {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("addr"),
            Arc::new(RefusingStorage),
        );
        AppDependencies {
            health_state: web::Data::new(HealthState::new(config.backend_name())),
            http_state: build_http_state(&config),
            key: config.key.clone(),
            cookie_secure: config.cookie_secure,
            same_site: config.same_site,
            session_ttl: config.session_ttl,
        }
    }

    #[rstest]
    #[case(Duration::from_secs(90), 90)]
    #[case(Duration::from_secs(u64::MAX), i64::MAX)]
    fn session_ttl_saturates(#[case] ttl: Duration, #[case] seconds: i64) {
        assert_eq!(session_ttl(ttl).whole_seconds(), seconds);
    }

    #[rstest]
    #[actix_web::test]
    async fn app_serves_api_health_and_trace_header() {
        let app = actix_test::init_service(build_app(deps())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api?type=categories").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("trace-id"));
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!([]));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_cookie_is_private_http_only_and_persistent() {
        let app = actix_test::init_service(build_app(deps())).await;
        let register = actix_test::TestRequest::post()
            .uri("/api")
            .set_json(json!({
                "type": "register",
                "email": "lin@example.com",
                "username": "lin_c",
                "password": "pass-phrase"
            }))
            .to_request();
        assert_eq!(actix_test::call_service(&app, register).await.status(), StatusCode::OK);

        let login = actix_test::TestRequest::post()
            .uri("/api")
            .set_json(json!({
                "type": "login",
                "email": "lin@example.com",
                "password": "pass-phrase"
            }))
            .to_request();
        let res = actix_test::call_service(&app, login).await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .expect("session cookie")
            .to_owned();
        assert!(cookie.starts_with("session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=7200"));
    }
}
