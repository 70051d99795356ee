//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod error;
pub mod postgres;
pub mod retry;

pub use connection::{create_pool, run_migrations};
pub use postgres::{PgAssetRepository, PgSessionRepository, PgUserRepository};
