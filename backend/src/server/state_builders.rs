//! Wiring of driven adapters into the HTTP state.
//!
//! With a pool the Diesel repositories back every port; otherwise a single
//! shared [`InMemoryStore`] does.

use std::sync::Arc;

use actix_web::web;

use clipstream::domain::ports::{
    EngagementRepository, UserRepository, VideoRepository, VideoStorage,
};
use clipstream::domain::{AccountService, EngagementService, FeedService, UploadService};
use clipstream::inbound::http::state::HttpState;
use clipstream::outbound::persistence::{
    DieselEngagementRepository, DieselUserRepository, DieselVideoRepository,
};
use clipstream::outbound::{Argon2Hasher, InMemoryStore};

use super::ServerConfig;

/// Compose the domain services over one set of repositories.
fn http_state_from_repositories<U, V, E>(
    users: Arc<U>,
    videos: Arc<V>,
    engagement: Arc<E>,
    storage: Arc<dyn VideoStorage>,
) -> HttpState
where
    U: UserRepository + 'static,
    V: VideoRepository + 'static,
    E: EngagementRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(users, Arc::new(Argon2Hasher::default())));
    HttpState {
        login: accounts.clone(),
        registration: accounts.clone(),
        profile: accounts,
        feed: Arc::new(FeedService::new(videos.clone())),
        engagement: Arc::new(EngagementService::new(videos.clone(), engagement)),
        uploads: Arc::new(UploadService::new(storage, videos)),
    }
}

/// Build the shared HTTP state for the configured persistence backend.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let storage = Arc::clone(&config.storage);
    let state = match &config.db_pool {
        Some(pool) => http_state_from_repositories(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselVideoRepository::new(pool.clone())),
            Arc::new(DieselEngagementRepository::new(pool.clone())),
            storage,
        ),
        None => {
            let store = Arc::new(InMemoryStore::default());
            http_state_from_repositories(store.clone(), store.clone(), store, storage)
        }
    };
    web::Data::new(state)
}
