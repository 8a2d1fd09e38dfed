//! Video storage adapters.
//!
//! `HttpVideoStorage` forwards files to a managed upload service; the
//! local variant writes under a media directory for development.

mod http_storage;
mod local_storage;

pub use http_storage::HttpVideoStorage;
pub use local_storage::LocalVideoStorage;

/// Join a base URL and an object key with exactly one separating slash.
pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}
