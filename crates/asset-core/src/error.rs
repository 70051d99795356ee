//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid login/password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Payload exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Payload truncated after {received} bytes: {reason}")]
    Truncated { received: u64, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
