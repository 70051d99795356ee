// ============================================================================
// Asset Core - Credential Service
// File: crates/asset-core/src/services/credential_service.rs
// ============================================================================
//! User signup and password verification

use std::sync::Arc;
use tracing::{info, warn};

use asset_security::PasswordService;

use crate::domain::UserId;
use crate::error::{DomainError, DomainResult};
use crate::repositories::UserRepository;

/// Creates users and checks login/password pairs
pub struct CredentialService {
    user_repo: Arc<dyn UserRepository>,
}

impl CredentialService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Register a new user. Login and password arrive already trimmed.
    pub async fn create_user(&self, login: &str, password: &str) -> DomainResult<UserId> {
        if login.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "login and password must not be empty".into(),
            ));
        }

        let password = password.to_owned();
        let password_hash = run_blocking(move || PasswordService::hash(&password))
            .await?
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        // Uniqueness is decided by the insert itself.
        match self.user_repo.create(login, &password_hash).await {
            Ok(id) => {
                info!(user_id = id, "User created");
                Ok(id)
            }
            Err(DomainError::AlreadyExists(_)) => {
                warn!("Signup rejected: login already taken");
                Err(DomainError::AlreadyExists(format!("user {}", login)))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a login/password pair to its user.
    ///
    /// Unknown login and wrong password are indistinguishable to the caller.
    pub async fn verify(&self, login: &str, password: &str) -> DomainResult<UserId> {
        let credentials = self.user_repo.find_credentials(login).await?;
        let password = password.to_owned();

        let Some(credentials) = credentials else {
            run_blocking(move || PasswordService::verify_dummy(&password)).await?;
            return Err(DomainError::InvalidCredentials);
        };

        let stored_hash = credentials.password_hash;
        let valid = run_blocking(move || PasswordService::verify(&password, &stored_hash))
            .await?
            .map_err(|e| {
                warn!(user_id = credentials.id, "Stored password hash unreadable: {}", e);
                DomainError::InvalidCredentials
            })?;

        if !valid {
            return Err(DomainError::InvalidCredentials);
        }
        Ok(credentials.id)
    }
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> DomainResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DomainError::Internal(format!("password task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserCredentials;
    use crate::repositories::MockUserRepository;

    #[tokio::test]
    async fn test_create_user_stores_argon2_hash() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|login, hash| {
                login == "alice"
                    && hash.starts_with("$argon2id$")
                    && PasswordService::verify("pw", hash).unwrap()
            })
            .times(1)
            .returning(|_, _| Ok(7));

        let service = CredentialService::new(Arc::new(repo));
        assert_eq!(service.create_user("alice", "pw").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_create_user_conflict_is_already_exists() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .returning(|_, _| Err(DomainError::AlreadyExists("users_login_key".into())));

        let service = CredentialService::new(Arc::new(repo));
        let err = service.create_user("alice", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_create_user_rejects_empty_fields() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let service = CredentialService::new(Arc::new(repo));
        assert!(matches!(
            service.create_user("", "pw").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.create_user("alice", "").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_unknown_login_and_wrong_password_look_alike() {
        let hash = PasswordService::hash("right").unwrap();
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials().returning(move |login| {
            Ok((login == "alice").then(|| UserCredentials {
                id: 1,
                password_hash: hash.clone(),
            }))
        });

        let service = CredentialService::new(Arc::new(repo));
        let unknown = service.verify("mallory", "right").await.unwrap_err();
        let wrong = service.verify("alice", "wrong").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(unknown, DomainError::InvalidCredentials));
        assert_eq!(service.verify("alice", "right").await.unwrap(), 1);
    }
}
