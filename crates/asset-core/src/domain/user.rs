//! User domain entity

/// Store-assigned user identity. Sequence values are never reused.
pub type UserId = i64;

/// What the credential check needs from a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub id: UserId,
    pub password_hash: String,
}
