//! Clipstream backend library: a short-form video sharing service.
//!
//! Layout follows a hexagonal split: `domain` holds values, ports and
//! services; `inbound::http` adapts actix-web requests onto the driving
//! ports; `outbound` implements the driven ports over PostgreSQL, memory,
//! Argon2 and video storage.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
