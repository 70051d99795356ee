//! Asset domain entities

use chrono::{DateTime, Utc};
use serde::Serialize;

use asset_shared::constants::{DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET};

use super::user::UserId;

/// Caller-supplied description of an upload; the payload arrives separately.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub name: String,
    pub original_name: Option<String>,
    pub content_type: String,
}

/// Fully received asset, ready to insert.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub owner: UserId,
    pub name: String,
    pub original_name: Option<String>,
    pub content_type: String,
    pub payload: Vec<u8>,
}

impl NewAsset {
    pub fn from_upload(owner: UserId, upload: AssetUpload, payload: Vec<u8>) -> Self {
        Self {
            owner,
            name: upload.name,
            original_name: upload.original_name,
            content_type: upload.content_type,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetContent {
    pub payload: Vec<u8>,
    pub original_name: Option<String>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetMetadata {
    pub name: String,
    pub original_name: Option<String>,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

/// Pagination window for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: DEFAULT_LIST_OFFSET,
        }
    }
}
