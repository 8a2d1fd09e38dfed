//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the `/api` operations, the health probes, and the
//! schemas they exchange. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    CategoryCount, Comment, Error, ErrorCode, FeedVideo, Like, TrendingHashtag, User,
    UserSummary, Video,
};
use crate::inbound::http::dto::{AuthRequest, LogoutResponse, UploadFormSchema, UserEnvelope};
use crate::inbound::http::health::ProbeBody;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api with type=login.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Clipstream API",
        description = "Short-form video sharing: accounts, uploads, feed, likes and comments.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::api::api_get,
        crate::inbound::http::api::api_post,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserSummary,
        Video,
        FeedVideo,
        Like,
        Comment,
        CategoryCount,
        TrendingHashtag,
        AuthRequest,
        UserEnvelope,
        LogoutResponse,
        UploadFormSchema,
        ProbeBody,
    )),
    tags(
        (name = "api", description = "Accounts, feed, engagement and uploads behind the `type` parameter"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("User", "email")]
    #[case("Video", "userId")]
    #[case("TrendingHashtag", "videoCount")]
    fn schemas_expose_camel_case_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .get(name)
            .unwrap_or_else(|| panic!("{name} schema"));
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    fn user_schema_never_mentions_the_password() {
        let json = ApiDoc::openapi().to_json().expect("serialise");
        let doc: serde_json::Value = serde_json::from_str(&json).expect("parse");
        let user = &doc["components"]["schemas"]["User"]["properties"];
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
    }

    #[rstest]
    fn api_resource_documents_all_methods() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api").expect("/api path");
        assert!(item.get.is_some());
        assert!(item.post.is_some());
        assert!(doc.paths.paths.contains_key("/health/ready"));
        assert!(doc.paths.paths.contains_key("/health/live"));
    }
}
