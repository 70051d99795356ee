//! Session domain entity

use std::fmt;

use chrono::{DateTime, Utc};
use super::user::UserId;

/// Opaque bearer token. `Debug` is redacted so tokens stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub token: SessionToken,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    /// True when an already-active session was handed back.
    pub reused: bool,
    /// IP recorded on the session row.
    pub ip_address: String,
}
