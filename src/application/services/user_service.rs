//! Account registration, sign-in and user lookups.

use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::auth_service::{AuthService, hash_password, verify_password};
use crate::domain::entities::{AuthenticatedUser, NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const USER_EXISTS: &str = "User already exists with this email or username";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration data after input validation. The password is still plain text.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// A signed-in user together with their access token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: AuthenticatedUser,
}

/// Trims and lowercases a username or email the way they are stored.
pub fn normalize_login(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Service for user accounts.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    auth: Arc<AuthService<R>>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>, auth: Arc<AuthService<R>>) -> Self {
        Self { repository, auth }
    }

    /// Creates an account without signing it in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username or email is taken.
    /// Returns [`AppError::Internal`] on hashing or database errors.
    pub async fn create_user(&self, registration: Registration) -> Result<User, AppError> {
        let username = normalize_login(&registration.username);
        let email = normalize_login(&registration.email);

        if self.repository.exists(&username, &email).await? {
            return Err(AppError::conflict(USER_EXISTS, json!({})));
        }

        let password_hash = hash_password(&registration.password)?;

        let user = self
            .repository
            .create(NewUser {
                username,
                email,
                password_hash,
                role: registration.role,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => AppError::conflict(USER_EXISTS, json!({})),
                other => other,
            })?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    /// Creates an account and returns a session for it.
    ///
    /// # Errors
    ///
    /// Same as [`create_user`](Self::create_user).
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, AppError> {
        let user = self.create_user(registration).await?;
        let identity = user.identity();
        let token = self.auth.issue_token(&identity)?;

        Ok(AuthSession {
            token,
            user: identity,
        })
    }

    /// Signs in with a username or an email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] ("Invalid credentials") for an unknown
    /// login or a wrong password, without telling the two apart.
    pub async fn login(&self, login: &str, password: &str) -> Result<AuthSession, AppError> {
        let login = normalize_login(login);

        let Some(user) = self.repository.find_by_login(&login).await? else {
            metrics::counter!("auth_login_failures_total").increment(1);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        };

        if !verify_password(password, &user.password_hash) {
            metrics::counter!("auth_login_failures_total").increment(1);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS, json!({})));
        }

        let identity = user.identity();
        let token = self.auth.issue_token(&identity)?;
        info!(user_id = %identity.id, "User logged in");

        Ok(AuthSession {
            token,
            user: identity,
        })
    }

    /// Re-reads the current user from the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] ("User not found") if the account is gone.
    pub async fn current_user(&self, user_id: Uuid) -> Result<AuthenticatedUser, AppError> {
        match self.repository.find_by_id(user_id).await? {
            Some(user) => Ok(user.identity()),
            None => {
                self.auth.forget_user(user_id).await;
                Err(AppError::not_found(
                    "User not found",
                    json!({"id": user_id.to_string()}),
                ))
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.repository.list().await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Removes every account. Used when reseeding.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_all(&self) -> Result<u64, AppError> {
        self.repository.delete_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;
    use crate::infrastructure::cache::NullCache;
    use chrono::Utc;
    use std::time::Duration;

    fn service(repo: MockUserRepository) -> UserService<MockUserRepository> {
        let repo = Arc::new(repo);
        let auth = Arc::new(AuthService::new(
            repo.clone(),
            Arc::new(NullCache::new()),
            "test-secret",
            Duration::from_secs(3600),
        ));
        UserService::new(repo, auth)
    }

    fn registration() -> Registration {
        Registration {
            username: "  NewUser ".to_string(),
            email: "New.User@Example.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Employee,
        }
    }

    fn stored(new_user: NewUser) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_and_hashes() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists()
            .withf(|username, email| username == "newuser" && email == "new.user@example.com")
            .times(1)
            .returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|u| u.password_hash.starts_with("$argon2") && u.password_hash != "secret1")
            .times(1)
            .returning(|u| Ok(stored(u)));

        let session = service(repo).register(registration()).await.unwrap();

        assert_eq!(session.user.username, "newuser");
        assert_eq!(session.user.email, "new.user@example.com");
        assert_eq!(session.user.role, Role::Employee);
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists().times(1).returning(|_, _| Ok(true));
        repo.expect_create().times(0);

        let err = service(repo).register(registration()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), USER_EXISTS);
    }

    #[tokio::test]
    async fn test_register_race_on_unique_key_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_exists().times(1).returning(|_, _| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::conflict("Unique constraint violation", json!({}))));

        let err = service(repo).register(registration()).await.unwrap_err();

        assert_eq!(err.to_string(), USER_EXISTS);
    }

    #[tokio::test]
    async fn test_login_with_username_or_email() {
        let hash = hash_password("admin123").unwrap();
        let user = stored(NewUser {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash,
            role: Role::Admin,
        });

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login()
            .withf(|login| login == "admin" || login == "admin@example.com")
            .times(2)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repo);

        let session = service.login(" ADMIN ", "admin123").await.unwrap();
        assert_eq!(session.user.role, Role::Admin);

        let session = service.login("Admin@Example.com", "admin123").await.unwrap();
        assert_eq!(session.user.username, "admin");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_look_the_same() {
        let hash = hash_password("admin123").unwrap();
        let user = stored(NewUser {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash,
            role: Role::Admin,
        });

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_login()
            .withf(|login| login == "admin")
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_find_by_login()
            .withf(|login| login == "ghost")
            .returning(|_| Ok(None));

        let service = service(repo);

        let wrong_password = service.login("admin", "nope").await.unwrap_err();
        let unknown_user = service.login("ghost", "admin123").await.unwrap_err();

        for err in [wrong_password, unknown_user] {
            assert!(matches!(err, AppError::Unauthorized { .. }));
            assert_eq!(err.to_string(), "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_current_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let err = service(repo).current_user(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_string(), "User not found");
    }
}
