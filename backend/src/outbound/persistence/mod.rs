//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; business rules stay in the domain services. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) never leave this module.
//! Connections come from a `bb8` pool over `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use clipstream::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clipstream")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_engagement_repository;
mod diesel_user_repository;
mod diesel_video_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_engagement_repository::DieselEngagementRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_video_repository::DieselVideoRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
