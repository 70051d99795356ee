//! Asset repository trait (port)

use async_trait::async_trait;

use crate::domain::{AssetContent, AssetMetadata, NewAsset, Page, UserId};
use crate::error::DomainResult;

/// Every query is scoped by owner; another user's rows are invisible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Fails with `DomainError::AlreadyExists` when (owner, name) is taken.
    async fn insert(&self, asset: &NewAsset) -> DomainResult<()>;

    async fn fetch(&self, owner: UserId, name: &str) -> DomainResult<Option<AssetContent>>;

    /// Newest first.
    async fn list(&self, owner: UserId, page: Page) -> DomainResult<Vec<AssetMetadata>>;

    /// True when a row was removed.
    async fn delete(&self, owner: UserId, name: &str) -> DomainResult<bool>;
}
