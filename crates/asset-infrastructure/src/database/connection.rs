//! Database connection pool

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use asset_shared::config::DatabaseSettings;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Bounded pool; callers block up to `acquire_timeout_seconds` for a
/// connection before the acquire fails.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_seconds))
        .connect(&settings.url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
