//! Storage and session behaviour against the in-memory adapters.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream;

use asset_core::domain::{AssetUpload, Page};
use asset_core::error::DomainError;
use asset_core::services::{AssetService, CredentialService, SessionManager};
use asset_core::upload::{BodyError, CappedBody};
use asset_infrastructure::{MemoryAssetRepository, MemorySessionRepository, MemoryUserRepository};

fn upload(name: &str) -> AssetUpload {
    AssetUpload {
        name: name.into(),
        original_name: None,
        content_type: "application/octet-stream".into(),
    }
}

fn body(payload: &'static [u8]) -> impl futures::Stream<Item = Result<Bytes, BodyError>> {
    stream::iter(vec![Ok(Bytes::from_static(payload))])
}

fn session_manager(
    users: Arc<MemoryUserRepository>,
    ttl: chrono::Duration,
) -> (Arc<CredentialService>, SessionManager) {
    let credentials = Arc::new(CredentialService::new(users));
    let sessions = Arc::new(MemorySessionRepository::new());
    let manager = SessionManager::new(credentials.clone(), sessions, ttl);
    (credentials, manager)
}

#[tokio::test]
async fn test_duplicate_login_rejected_and_ids_not_reused() {
    let credentials = CredentialService::new(Arc::new(MemoryUserRepository::new()));

    let first = credentials.create_user("alice", "pw").await.unwrap();
    let err = credentials.create_user("alice", "other").await.unwrap_err();
    assert!(matches!(err, DomainError::AlreadyExists(_)));

    let second = credentials.create_user("bob", "pw").await.unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn test_relogin_within_ttl_returns_same_token() {
    let (credentials, manager) =
        session_manager(Arc::new(MemoryUserRepository::new()), chrono::Duration::hours(24));
    let id = credentials.create_user("alice", "pw").await.unwrap();

    let first = manager.authenticate("alice", "pw", "10.0.0.1").await.unwrap();
    let second = manager.authenticate("alice", "pw", "10.0.0.2").await.unwrap();
    assert_eq!(first.token, second.token);
    assert!(second.reused);

    assert_eq!(manager.validate_token(first.token.as_str()).await.unwrap(), id);
}

#[tokio::test]
async fn test_login_after_expiry_returns_new_token() {
    let (credentials, manager) = session_manager(
        Arc::new(MemoryUserRepository::new()),
        chrono::Duration::milliseconds(20),
    );
    credentials.create_user("alice", "pw").await.unwrap();

    let first = manager.authenticate("alice", "pw", "10.0.0.1").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert!(matches!(
        manager.validate_token(first.token.as_str()).await,
        Err(DomainError::InvalidToken)
    ));

    let second = manager.authenticate("alice", "pw", "10.0.0.1").await.unwrap();
    assert_ne!(first.token, second.token);
    assert!(!second.reused);
}

#[tokio::test]
async fn test_sweep_removes_only_expired_sessions() {
    let users = Arc::new(MemoryUserRepository::new());
    let credentials = Arc::new(CredentialService::new(users));
    let sessions = Arc::new(MemorySessionRepository::new());
    credentials.create_user("alice", "pw").await.unwrap();
    credentials.create_user("bob", "pw").await.unwrap();

    let short = SessionManager::new(
        credentials.clone(),
        sessions.clone(),
        chrono::Duration::milliseconds(10),
    );
    let long = SessionManager::new(credentials, sessions.clone(), chrono::Duration::hours(1));
    short.authenticate("alice", "pw", "10.0.0.1").await.unwrap();
    let kept = long.authenticate("bob", "pw", "10.0.0.1").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;

    assert_eq!(long.sweep_expired().await.unwrap(), 1);
    assert_eq!(sessions.len(), 1);
    assert!(long.validate_token(kept.token.as_str()).await.is_ok());
}

#[tokio::test]
async fn test_racing_uploads_one_wins() {
    let assets = Arc::new(AssetService::new(Arc::new(MemoryAssetRepository::new())));

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let assets = assets.clone();
            tokio::spawn(async move { assets.upload(1, upload("report"), body(b"data")).await })
        })
        .collect();

    let mut ok = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(()) => ok += 1,
            Err(DomainError::AlreadyExists(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!((ok, conflicts), (1, 1));
}

#[tokio::test]
async fn test_other_owner_cannot_see_asset() {
    let assets = AssetService::new(Arc::new(MemoryAssetRepository::new()));
    assets.upload(2, upload("shared"), body(b"b's")).await.unwrap();

    assert!(matches!(
        assets.fetch(1, "shared").await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        assets.delete(1, "shared").await,
        Err(DomainError::NotFound(_))
    ));
    assert_eq!(assets.fetch(2, "shared").await.unwrap().payload, b"b's");
    assert!(assets.list(1, Page::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_is_newest_first_and_paginated() {
    let assets = AssetService::new(Arc::new(MemoryAssetRepository::new()));
    for name in ["one", "two", "three"] {
        assets.upload(1, upload(name), body(b"x")).await.unwrap();
    }

    let first: Vec<_> = assets
        .list(1, Page::new(2, 0))
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(first, ["three", "two"]);

    let rest: Vec<_> = assets
        .list(1, Page::new(2, 2))
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(rest, ["one"]);
}

#[tokio::test]
async fn test_delete_then_fetch_not_found() {
    let repo = Arc::new(MemoryAssetRepository::new());
    let assets = AssetService::new(repo.clone());
    assets.upload(1, upload("gone"), body(b"x")).await.unwrap();
    assets.upload(1, upload("stays"), body(b"y")).await.unwrap();

    assets.delete(1, "gone").await.unwrap();
    assert!(matches!(assets.fetch(1, "gone").await, Err(DomainError::NotFound(_))));

    assert!(matches!(
        assets.delete(1, "never").await,
        Err(DomainError::NotFound(_))
    ));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_cut_short_upload_leaves_no_row() {
    let repo = Arc::new(MemoryAssetRepository::new());
    let assets = AssetService::new(repo.clone());

    let cut = stream::iter(vec![
        Ok(Bytes::from_static(b"half")),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
    ]);
    let err = assets
        .upload(1, upload("cut"), CappedBody::new(cut, 1024, None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Truncated { .. }));

    let big = stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from(vec![0u8; 64]))]);
    let err = assets
        .upload(1, upload("big"), CappedBody::new(big, 32, Some(64)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::TooLarge { limit: 32 }));

    assert!(repo.is_empty());
}
