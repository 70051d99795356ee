// ============================================================================
// Asset Infrastructure - PostgreSQL Asset Repository
// File: crates/asset-infrastructure/src/database/postgres/asset_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use asset_core::domain::{AssetContent, AssetMetadata, NewAsset, Page, UserId};
use asset_core::error::DomainError;
use asset_core::repositories::AssetRepository;

use crate::database::error::{is_transient, map_db_error};
use crate::database::retry::with_retry;

pub struct PgAssetRepository {
    pool: PgPool,
}

impl PgAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_once(&self, asset: &NewAsset) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO assets (user_id, name, original_name, content_type, payload)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(asset.owner)
        .bind(&asset.name)
        .bind(asset.original_name.as_deref())
        .bind(&asset.content_type)
        .bind(asset.payload.as_slice())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct ContentRow {
    payload: Vec<u8>,
    original_name: Option<String>,
    content_type: String,
}

#[derive(Debug, FromRow)]
struct MetadataRow {
    name: String,
    original_name: Option<String>,
    content_type: String,
    created_at: DateTime<Utc>,
}

impl From<ContentRow> for AssetContent {
    fn from(row: ContentRow) -> Self {
        AssetContent {
            payload: row.payload,
            original_name: row.original_name,
            content_type: row.content_type,
        }
    }
}

impl From<MetadataRow> for AssetMetadata {
    fn from(row: MetadataRow) -> Self {
        AssetMetadata {
            name: row.name,
            original_name: row.original_name,
            content_type: row.content_type,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AssetRepository for PgAssetRepository {
    async fn insert(&self, asset: &NewAsset) -> Result<(), DomainError> {
        with_retry("insert asset", is_transient, move || self.insert_once(asset))
            .await
            .map_err(|e| map_db_error("insert asset", e))
    }

    async fn fetch(&self, owner: UserId, name: &str) -> Result<Option<AssetContent>, DomainError> {
        let row: Option<ContentRow> = sqlx::query_as(
            r#"
            SELECT payload, original_name, content_type
            FROM assets
            WHERE user_id = $1 AND name = $2
            "#,
        )
        .bind(owner)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("fetch asset", e))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, owner: UserId, page: Page) -> Result<Vec<AssetMetadata>, DomainError> {
        let rows: Vec<MetadataRow> = sqlx::query_as(
            r#"
            SELECT name, original_name, content_type, created_at
            FROM assets
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("list assets", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, owner: UserId, name: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM assets WHERE user_id = $1 AND name = $2")
            .bind(owner)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("delete asset", e))?;

        Ok(result.rows_affected() > 0)
    }
}
