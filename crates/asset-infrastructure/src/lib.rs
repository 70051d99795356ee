//! # Asset Infrastructure
//!
//! PostgreSQL adapters for the repository traits, plus in-memory adapters
//! used by tests and local runs.

pub mod database;
pub mod memory;

pub use database::{
    create_pool, run_migrations, PgAssetRepository, PgSessionRepository, PgUserRepository,
};
pub use memory::{MemoryAssetRepository, MemorySessionRepository, MemoryUserRepository};
