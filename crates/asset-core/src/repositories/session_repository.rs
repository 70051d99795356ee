//! Session repository trait (port)

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::{SessionGrant, UserId};
use crate::error::DomainResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Returns the user's active session if one exists, otherwise removes every
    /// session row of the user and inserts a fresh one expiring after `ttl`.
    ///
    /// The whole sequence is atomic: concurrent calls for one user must never
    /// leave two live sessions behind.
    async fn issue(&self, user_id: UserId, ip_address: &str, ttl: Duration)
        -> DomainResult<SessionGrant>;

    /// Owner of `token` if the session exists and has not expired.
    async fn find_active_user(&self, token: &str) -> DomainResult<Option<UserId>>;

    /// Deletes expired rows, returning how many went away.
    async fn purge_expired(&self) -> DomainResult<u64>;
}
