use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use asset_core::domain::{UserCredentials, UserId};
use asset_core::error::{DomainError, DomainResult};
use asset_core::repositories::UserRepository;

#[derive(Default)]
pub struct MemoryUserRepository {
    inner: Mutex<UserTable>,
}

#[derive(Default)]
struct UserTable {
    last_id: UserId,
    by_login: HashMap<String, UserCredentials>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, login: &str, password_hash: &str) -> DomainResult<UserId> {
        let mut table = self.inner.lock();
        if table.by_login.contains_key(login) {
            return Err(DomainError::AlreadyExists("users_login_key".into()));
        }
        table.last_id += 1;
        let id = table.last_id;
        table.by_login.insert(
            login.to_owned(),
            UserCredentials {
                id,
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(id)
    }

    async fn find_credentials(&self, login: &str) -> DomainResult<Option<UserCredentials>> {
        Ok(self.inner.lock().by_login.get(login).cloned())
    }
}
