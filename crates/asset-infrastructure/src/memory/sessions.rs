use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use asset_core::domain::{SessionGrant, SessionToken, UserId};
use asset_core::error::DomainResult;
use asset_core::repositories::SessionRepository;
use asset_security::generate_session_token;

#[derive(Default)]
pub struct MemorySessionRepository {
    by_token: Mutex<HashMap<String, StoredSession>>,
}

#[derive(Clone)]
struct StoredSession {
    user_id: UserId,
    ip_address: String,
    expires_at: DateTime<Utc>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.by_token.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn issue(
        &self,
        user_id: UserId,
        ip_address: &str,
        ttl: Duration,
    ) -> DomainResult<SessionGrant> {
        let mut sessions = self.by_token.lock();
        let now = Utc::now();

        let active = sessions
            .iter()
            .find(|(_, s)| s.user_id == user_id && s.expires_at > now)
            .map(|(token, s)| (token.clone(), s.clone()));
        if let Some((token, session)) = active {
            return Ok(SessionGrant {
                token: SessionToken::new(token),
                user_id,
                expires_at: session.expires_at,
                reused: true,
                ip_address: session.ip_address,
            });
        }

        sessions.retain(|_, s| s.user_id != user_id);
        let token = generate_session_token();
        let expires_at = now + ttl;
        sessions.insert(
            token.clone(),
            StoredSession {
                user_id,
                ip_address: ip_address.to_owned(),
                expires_at,
            },
        );

        Ok(SessionGrant {
            token: SessionToken::new(token),
            user_id,
            expires_at,
            reused: false,
            ip_address: ip_address.to_owned(),
        })
    }

    async fn find_active_user(&self, token: &str) -> DomainResult<Option<UserId>> {
        let now = Utc::now();
        Ok(self
            .by_token
            .lock()
            .get(token)
            .filter(|s| s.expires_at > now)
            .map(|s| s.user_id))
    }

    async fn purge_expired(&self) -> DomainResult<u64> {
        let now = Utc::now();
        let mut sessions = self.by_token.lock();
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}
