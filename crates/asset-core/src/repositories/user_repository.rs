//! User repository trait (port)

use async_trait::async_trait;

use crate::domain::{UserCredentials, UserId};
use crate::error::DomainResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user row. A taken login must surface as
    /// `DomainError::AlreadyExists` from the store's uniqueness constraint.
    async fn create(&self, login: &str, password_hash: &str) -> DomainResult<UserId>;

    async fn find_credentials(&self, login: &str) -> DomainResult<Option<UserCredentials>>;
}
