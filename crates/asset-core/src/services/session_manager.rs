// ============================================================================
// Asset Core - Session Manager
// File: crates/asset-core/src/services/session_manager.rs
// ============================================================================
//! Login, token validation and expired-session cleanup

use std::sync::Arc;
use chrono::Duration;
use tracing::{debug, info, warn};

use crate::domain::{SessionGrant, UserId};
use crate::error::{DomainError, DomainResult};
use crate::repositories::SessionRepository;
use crate::services::CredentialService;

pub struct SessionManager {
    credentials: Arc<CredentialService>,
    session_repo: Arc<dyn SessionRepository>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(
        credentials: Arc<CredentialService>,
        session_repo: Arc<dyn SessionRepository>,
        ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            session_repo,
            ttl,
        }
    }

    /// Authenticate and hand out the user's single active session.
    ///
    /// Repeated logins before expiry return the same token.
    pub async fn authenticate(
        &self,
        login: &str,
        password: &str,
        client_ip: &str,
    ) -> DomainResult<SessionGrant> {
        let user_id = match self.credentials.verify(login, password).await {
            Ok(id) => id,
            Err(DomainError::InvalidCredentials) => {
                warn!(client_ip, "Login failed: invalid login/password");
                return Err(DomainError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let grant = self.session_repo.issue(user_id, client_ip, self.ttl).await?;

        if grant.reused {
            if grant.ip_address != client_ip {
                // One token may be used from several addresses; record it.
                warn!(
                    user_id,
                    session_ip = %grant.ip_address,
                    client_ip,
                    "Active session reused from a different IP"
                );
            }
            debug!(user_id, "Returning existing session");
        } else {
            info!(user_id, expires_at = %grant.expires_at, "Session created");
        }

        Ok(grant)
    }

    /// Owner of a live token. No side effects.
    pub async fn validate_token(&self, token: &str) -> DomainResult<UserId> {
        if token.is_empty() {
            return Err(DomainError::InvalidToken);
        }
        self.session_repo
            .find_active_user(token)
            .await?
            .ok_or(DomainError::InvalidToken)
    }

    pub async fn sweep_expired(&self) -> DomainResult<u64> {
        self.session_repo.purge_expired().await
    }
}
