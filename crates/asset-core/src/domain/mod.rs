//! # Asset Core - Domain Module
//!
//! Entities persisted by the durable store.

pub mod user;
pub mod session;
pub mod asset;

pub use user::{UserCredentials, UserId};
pub use session::{SessionGrant, SessionToken};
pub use asset::{AssetContent, AssetMetadata, AssetUpload, NewAsset, Page};
