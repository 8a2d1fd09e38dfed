//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use clipstream::domain::ports::VideoStorage;
use clipstream::outbound::persistence::DbPool;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl: Duration,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Arc<dyn VideoStorage>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration; persistence defaults to memory.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        storage: Arc<dyn VideoStorage>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl: DEFAULT_SESSION_TTL,
            bind_addr,
            storage,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Lifetime of persistent login sessions.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Name of the persistence backend reported by the health probes.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        if self.db_pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clipstream::domain::ports::{VideoBlob, VideoStorageError};
    use rstest::rstest;

    struct NullStorage;

    #[async_trait]
    impl VideoStorage for NullStorage {
        async fn store(&self, _blob: &VideoBlob) -> Result<String, VideoStorageError> {
            Err(VideoStorageError::rejected("unused"))
        }

        async fn discard(&self, _blob: &VideoBlob) -> Result<(), VideoStorageError> {
            Ok(())
        }
    }

    #[rstest]
    fn defaults_to_memory_and_two_hour_sessions() {
        let config = ServerConfig::new(
            Key::generate(),
            true,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("addr"),
            Arc::new(NullStorage),
        );
        assert_eq!(config.backend_name(), "memory");
        assert_eq!(config.session_ttl, DEFAULT_SESSION_TTL);

        let config = config.with_session_ttl(Duration::from_secs(60));
        assert_eq!(config.session_ttl, Duration::from_secs(60));
    }
}
