// ============================================================================
// Asset Core - Asset Service
// File: crates/asset-core/src/services/asset_service.rs
// ============================================================================
//! Owner-scoped upload, fetch, list and delete

use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{info, warn};

use crate::domain::{AssetContent, AssetMetadata, AssetUpload, NewAsset, Page, UserId};
use crate::error::{DomainError, DomainResult};
use crate::repositories::AssetRepository;
use crate::upload::BodyError;

pub struct AssetService {
    asset_repo: Arc<dyn AssetRepository>,
}

impl AssetService {
    pub fn new(asset_repo: Arc<dyn AssetRepository>) -> Self {
        Self { asset_repo }
    }

    /// Read `body` to the end, then insert it under (owner, name).
    ///
    /// `body` must already be capped (see [`crate::upload::CappedBody`]).
    /// Nothing is written unless the whole payload arrived.
    pub async fn upload<S>(&self, owner: UserId, upload: AssetUpload, body: S) -> DomainResult<()>
    where
        S: Stream<Item = Result<Bytes, BodyError>> + Send,
    {
        if upload.name.is_empty() {
            return Err(DomainError::Validation("asset name must not be empty".into()));
        }

        let mut body = std::pin::pin!(body);
        let mut payload = Vec::new();
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => payload.extend_from_slice(&chunk),
                Err(e) => {
                    warn!(owner, name = %upload.name, "Upload aborted: {}", e);
                    return Err(e.into_domain(payload.len() as u64));
                }
            }
        }

        let size = payload.len();
        let asset = NewAsset::from_upload(owner, upload, payload);
        match self.asset_repo.insert(&asset).await {
            Ok(()) => {
                info!(owner, name = %asset.name, size, "Asset stored");
                Ok(())
            }
            Err(DomainError::AlreadyExists(_)) => {
                Err(DomainError::AlreadyExists(format!("asset {}", asset.name)))
            }
            Err(e) => Err(e),
        }
    }

    /// Another owner's asset reads as absent.
    pub async fn fetch(&self, owner: UserId, name: &str) -> DomainResult<AssetContent> {
        self.asset_repo
            .fetch(owner, name)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("asset {}", name)))
    }

    pub async fn list(&self, owner: UserId, page: Page) -> DomainResult<Vec<AssetMetadata>> {
        if page.limit < 0 || page.offset < 0 {
            return Err(DomainError::Validation(
                "limit and offset must be non-negative".into(),
            ));
        }
        self.asset_repo.list(owner, page).await
    }

    pub async fn delete(&self, owner: UserId, name: &str) -> DomainResult<()> {
        if !self.asset_repo.delete(owner, name).await? {
            return Err(DomainError::NotFound(format!("asset {}", name)));
        }
        info!(owner, name, "Asset deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    use crate::repositories::MockAssetRepository;
    use crate::upload::CappedBody;

    fn upload(name: &str) -> AssetUpload {
        AssetUpload {
            name: name.into(),
            original_name: Some("photo.png".into()),
            content_type: "image/png".into(),
        }
    }

    fn body(parts: Vec<&'static [u8]>, limit: u64) -> CappedBody<impl Stream<Item = Result<Bytes, std::io::Error>>> {
        let chunks = parts.into_iter().map(|p| Ok(Bytes::from_static(p))).collect::<Vec<_>>();
        CappedBody::new(stream::iter(chunks), limit, None)
    }

    #[tokio::test]
    async fn test_upload_inserts_whole_payload() {
        let mut repo = MockAssetRepository::new();
        repo.expect_insert()
            .withf(|asset| {
                asset.owner == 1
                    && asset.name == "avatar"
                    && asset.payload == b"hello world"
                    && asset.original_name.as_deref() == Some("photo.png")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = AssetService::new(Arc::new(repo));
        service
            .upload(1, upload("avatar"), body(vec![b"hello ", b"world"], 1024))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_oversized_upload_writes_nothing() {
        let mut repo = MockAssetRepository::new();
        repo.expect_insert().never();

        let service = AssetService::new(Arc::new(repo));
        let err = service
            .upload(1, upload("big"), body(vec![b"0123456789", b"0123456789"], 15))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TooLarge { limit: 15 }));
    }

    #[tokio::test]
    async fn test_interrupted_upload_is_truncated() {
        let mut repo = MockAssetRepository::new();
        repo.expect_insert().never();

        let inner = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "peer closed")),
        ]);
        let service = AssetService::new(Arc::new(repo));
        let err = service
            .upload(1, upload("cut"), CappedBody::new(inner, 1024, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Truncated { received: 7, .. }));
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let mut repo = MockAssetRepository::new();
        repo.expect_insert().never();

        let service = AssetService::new(Arc::new(repo));
        let err = service.upload(1, upload(""), body(vec![b"x"], 10)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_asset_is_not_found() {
        let mut repo = MockAssetRepository::new();
        repo.expect_fetch().returning(|_, _| Ok(None));
        repo.expect_delete().returning(|_, _| Ok(false));

        let service = AssetService::new(Arc::new(repo));
        assert!(matches!(service.fetch(2, "x").await, Err(DomainError::NotFound(_))));
        assert!(matches!(service.delete(2, "x").await, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_negative_page_rejected() {
        let mut repo = MockAssetRepository::new();
        repo.expect_list().never();

        let service = AssetService::new(Arc::new(repo));
        assert!(matches!(
            service.list(1, Page::new(-1, 0)).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.list(1, Page::new(10, -5)).await,
            Err(DomainError::Validation(_))
        ));
    }
}
