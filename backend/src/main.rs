//! Clipstream entry-point: loads configuration, wires adapters and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clipstream::domain::ports::VideoStorage;
use clipstream::inbound::http::health::HealthState;
use clipstream::inbound::http::session_config::{BuildMode, session_settings_from_env};
use clipstream::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use clipstream::outbound::{HttpVideoStorage, LocalVideoStorage};
use clipstream::settings::{AppSettings, StorageTarget};
use server::{ServerConfig, create_server};

fn build_storage(settings: &AppSettings) -> std::io::Result<Arc<dyn VideoStorage>> {
    let target = settings.storage_target().map_err(std::io::Error::other)?;
    match target {
        StorageTarget::Http {
            endpoint,
            token,
            timeout,
        } => {
            info!(endpoint = %endpoint, "uploading videos to remote storage");
            let storage = HttpVideoStorage::new(endpoint, token, timeout)
                .map_err(|e| std::io::Error::other(format!("upload client: {e}")))?;
            Ok(Arc::new(storage))
        }
        StorageTarget::Local {
            media_dir,
            base_url,
        } => {
            warn!(dir = %media_dir.display(), "storing videos on local disk (dev only)");
            Ok(Arc::new(LocalVideoStorage::open(media_dir, base_url)?))
        }
    }
}

async fn connect_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url() else {
        warn!("no database_url configured; using in-memory store");
        return Ok(None);
    };
    run_pending_migrations(url)
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
        .await
        .map_err(std::io::Error::other)?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let storage = build_storage(&settings)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
        storage,
    )
    .with_session_ttl(session.ttl);
    if let Some(pool) = connect_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new(config.backend_name()));
    info!(addr = %settings.bind_addr(), backend = config.backend_name(), "starting server");
    let server = create_server(health_state, config)?;
    server.await
}
