// ============================================================================
// Asset Infrastructure - PostgreSQL Session Repository
// File: crates/asset-infrastructure/src/database/postgres/session_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use asset_core::domain::{SessionGrant, SessionToken, UserId};
use asset_core::error::DomainError;
use asset_core::repositories::SessionRepository;
use asset_security::generate_session_token;

use crate::database::error::{is_transient, is_unique_violation, map_db_error};
use crate::database::retry::with_retry;

/// Serializes concurrent logins of the same user. `NO KEY` leaves the
/// `KEY SHARE` lock taken by foreign-key checks on `assets` and `sessions`
/// free, so uploads by that user do not queue behind a login.
const LOCK_USER_ROW: &str = "SELECT id FROM users WHERE id = $1 FOR NO KEY UPDATE";

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One login attempt in one transaction. Expiry is computed from the
    /// database clock, the same one `find_active_user` compares against.
    async fn issue_once(
        &self,
        user_id: UserId,
        ip_address: &str,
        ttl_seconds: f64,
    ) -> Result<SessionGrant, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i64>(LOCK_USER_ROW)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let active: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT token, user_id, ip_address, expires_at
            FROM sessions
            WHERE user_id = $1 AND expires_at > now()
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = active {
            tx.commit().await?;
            return Ok(row.into_grant(true));
        }

        let stale = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if stale > 0 {
            debug!(user_id, stale, "Removed stale sessions");
        }

        let row: SessionRow = sqlx::query_as(
            r#"
            INSERT INTO sessions (token, user_id, ip_address, expires_at)
            VALUES ($1, $2, $3, now() + make_interval(secs => $4))
            RETURNING token, user_id, ip_address, expires_at
            "#,
        )
        .bind(generate_session_token())
        .bind(user_id)
        .bind(ip_address)
        .bind(ttl_seconds)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into_grant(false))
    }
}

#[derive(Debug, FromRow)]
struct SessionRow {
    token: String,
    user_id: i64,
    ip_address: String,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_grant(self, reused: bool) -> SessionGrant {
        SessionGrant {
            token: SessionToken::new(self.token),
            user_id: self.user_id,
            expires_at: self.expires_at,
            reused,
            ip_address: self.ip_address,
        }
    }
}

/// A concurrent insert that lost the `sessions.user_id` race is retried; the
/// next attempt sees the winner's row.
fn retry_issue(e: &sqlx::Error) -> bool {
    is_transient(e) || is_unique_violation(e)
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn issue(
        &self,
        user_id: UserId,
        ip_address: &str,
        ttl: Duration,
    ) -> Result<SessionGrant, DomainError> {
        let ttl_seconds = ttl.num_milliseconds() as f64 / 1000.0;
        with_retry("issue session", retry_issue, move || {
            self.issue_once(user_id, ip_address, ttl_seconds)
        })
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => DomainError::NotFound(format!("user {}", user_id)),
            e => map_db_error("issue session", e),
        })
    }

    async fn find_active_user(&self, token: &str) -> Result<Option<UserId>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM sessions
            WHERE token = $1 AND expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("validate session token", e))
    }

    async fn purge_expired(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("purge expired sessions", e))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use asset_core::domain::NewAsset;
    use asset_core::repositories::{AssetRepository, UserRepository};

    use super::*;
    use crate::database::{run_migrations, PgAssetRepository, PgUserRepository};

    #[tokio::test]
    async fn test_login_lock_does_not_block_asset_insert() {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else { return };
        let pool = PgPool::connect(&url).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let login = format!("lock-{}", generate_session_token());
        let user_id = PgUserRepository::new(pool.clone()).create(&login, "hash").await.unwrap();

        let mut held = pool.begin().await.unwrap();
        sqlx::query_scalar::<_, i64>(LOCK_USER_ROW)
            .bind(user_id)
            .fetch_one(&mut *held)
            .await
            .unwrap();

        let asset = NewAsset {
            owner: user_id,
            name: "during-login".into(),
            original_name: None,
            content_type: "text/plain".into(),
            payload: b"x".to_vec(),
        };
        let assets = PgAssetRepository::new(pool.clone());
        tokio::time::timeout(StdDuration::from_secs(5), assets.insert(&asset))
            .await
            .expect("asset insert waited on the login lock")
            .unwrap();

        held.rollback().await.unwrap();
    }
}
