use std::sync::Arc;

use asset_core::services::{AssetService, CredentialService, SessionManager};

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialService>,
    pub sessions: Arc<SessionManager>,
    pub assets: Arc<AssetService>,
    /// Hard cap on upload payload bytes.
    pub upload_limit: u64,
}
