//! sqlx error classification

use tracing::error;

use asset_core::error::DomainError;

/// SQLSTATE codes worth another attempt: serialization failure and deadlock.
const TRANSIENT_CODES: [&str; 2] = ["40001", "40P01"];

pub fn is_transient(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db
            .code()
            .is_some_and(|code| TRANSIENT_CODES.contains(&code.as_ref())),
        _ => false,
    }
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Maps a store failure onto the domain error kinds. `context` names the
/// failed operation in logs and messages.
pub fn map_db_error(context: &str, e: sqlx::Error) -> DomainError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            DomainError::AlreadyExists(db.constraint().unwrap_or(context).to_string())
        }
        sqlx::Error::RowNotFound => DomainError::NotFound(context.to_string()),
        ref e if is_transient(e) => {
            error!("Database transaction failed to {}: {}", context, e);
            DomainError::Unavailable(format!("{}: {}", context, e))
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            error!("Database unreachable while trying to {}: {}", context, e);
            DomainError::Unavailable(format!("{}: {}", context, e))
        }
        e => {
            error!("Database error while trying to {}: {}", context, e);
            DomainError::Internal(format!("{}: {}", context, e))
        }
    }
}
