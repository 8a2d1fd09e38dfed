//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories for development and tests
//! - **password**: Argon2id credential hasher
//! - **storage**: upload service and local media directory adapters
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod password;
pub mod persistence;
pub mod storage;

pub use memory::InMemoryStore;
pub use password::Argon2Hasher;
pub use storage::{HttpVideoStorage, LocalVideoStorage};
