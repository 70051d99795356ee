// ============================================================================
// Asset Infrastructure - PostgreSQL User Repository
// File: crates/asset-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use asset_core::domain::{UserCredentials, UserId};
use asset_core::error::DomainError;
use asset_core::repositories::UserRepository;

use crate::database::error::map_db_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CredentialsRow {
    id: i64,
    password_hash: String,
}

impl From<CredentialsRow> for UserCredentials {
    fn from(row: CredentialsRow) -> Self {
        UserCredentials {
            id: row.id,
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, login: &str, password_hash: &str) -> Result<UserId, DomainError> {
        sqlx::query_scalar(
            r#"
            INSERT INTO users (login, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("create user", e))
    }

    async fn find_credentials(&self, login: &str) -> Result<Option<UserCredentials>, DomainError> {
        let row: Option<CredentialsRow> = sqlx::query_as(
            r#"
            SELECT id, password_hash
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("find user by login", e))?;

        Ok(row.map(Into::into))
    }
}
