use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use asset_core::domain::{AssetContent, AssetMetadata, NewAsset, Page, UserId};
use asset_core::error::{DomainError, DomainResult};
use asset_core::repositories::AssetRepository;

#[derive(Default)]
pub struct MemoryAssetRepository {
    inner: Mutex<AssetTable>,
}

#[derive(Default)]
struct AssetTable {
    /// Insertion sequence, the tiebreaker for equal timestamps.
    last_seq: u64,
    rows: HashMap<(UserId, String), StoredAsset>,
}

struct StoredAsset {
    seq: u64,
    original_name: Option<String>,
    content_type: String,
    payload: Vec<u8>,
    created_at: DateTime<Utc>,
}

impl MemoryAssetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AssetRepository for MemoryAssetRepository {
    async fn insert(&self, asset: &NewAsset) -> DomainResult<()> {
        let mut table = self.inner.lock();
        let key = (asset.owner, asset.name.clone());
        if table.rows.contains_key(&key) {
            return Err(DomainError::AlreadyExists("assets_user_id_name_key".into()));
        }
        table.last_seq += 1;
        let seq = table.last_seq;
        table.rows.insert(
            key,
            StoredAsset {
                seq,
                original_name: asset.original_name.clone(),
                content_type: asset.content_type.clone(),
                payload: asset.payload.clone(),
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn fetch(&self, owner: UserId, name: &str) -> DomainResult<Option<AssetContent>> {
        let table = self.inner.lock();
        Ok(table
            .rows
            .get(&(owner, name.to_owned()))
            .map(|row| AssetContent {
                payload: row.payload.clone(),
                original_name: row.original_name.clone(),
                content_type: row.content_type.clone(),
            }))
    }

    async fn list(&self, owner: UserId, page: Page) -> DomainResult<Vec<AssetMetadata>> {
        let table = self.inner.lock();
        let mut owned: Vec<_> = table
            .rows
            .iter()
            .filter(|((user_id, _), _)| *user_id == owner)
            .collect();
        owned.sort_by(|(_, a), (_, b)| {
            (b.created_at, b.seq).cmp(&(a.created_at, a.seq))
        });

        Ok(owned
            .into_iter()
            .skip(page.offset.max(0) as usize)
            .take(page.limit.max(0) as usize)
            .map(|((_, name), row)| AssetMetadata {
                name: name.clone(),
                original_name: row.original_name.clone(),
                content_type: row.content_type.clone(),
                created_at: row.created_at,
            })
            .collect())
    }

    async fn delete(&self, owner: UserId, name: &str) -> DomainResult<bool> {
        Ok(self
            .inner
            .lock()
            .rows
            .remove(&(owner, name.to_owned()))
            .is_some())
    }
}
