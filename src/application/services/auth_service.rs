//! Authentication: password hashing, access tokens and request identity.
//!
//! Access tokens are HS256 JWTs carrying `{ userId, role, username, iat, exp }`.
//! Resolving a token to an identity goes through the user-lookup cache first
//! and falls back to the user repository.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{AuthenticatedUser, Role};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub role: Role,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Hashes a password into an Argon2 PHC string with a random salt.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::internal("Password hashing failed", json!({}))
        })
}

/// Checks a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Issues and verifies access tokens and resolves them to identities.
pub struct AuthService<R: UserRepository + ?Sized> {
    users: Arc<R>,
    cache: Arc<dyn CacheService>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - user repository used when the cache misses
    /// - `cache` - user-lookup cache
    /// - `jwt_secret` - HS256 signing secret
    /// - `token_ttl` - lifetime of issued tokens
    pub fn new(
        users: Arc<R>,
        cache: Arc<dyn CacheService>,
        jwt_secret: &str,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            cache,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl,
        }
    }

    /// Signs an access token for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails.
    pub fn issue_token(&self, user: &AuthenticatedUser) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            user_id: user.id.to_string(),
            role: user.role,
            username: user.username.clone(),
            iat,
            exp: iat.saturating_add(ttl),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Token encoding failed");
            AppError::internal("Token generation failed", json!({}))
        })
    }

    /// Verifies signature and expiry and returns the claims.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for invalid or expired tokens.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Rejected access token");
                AppError::unauthorized(
                    "Invalid or expired token",
                    json!({"reason": e.to_string()}),
                )
            })
    }

    /// Resolves a bearer token to the user it belongs to.
    ///
    /// Never fails: an invalid token, a deleted user or a storage error all
    /// yield `None`, i.e. an anonymous request. Whether anonymity is
    /// acceptable is decided per operation.
    pub async fn authenticate(&self, token: &str) -> Option<AuthenticatedUser> {
        let claims = self.verify_token(token).ok()?;
        let user_id = Uuid::parse_str(&claims.user_id).ok()?;

        if let Ok(Some(user)) = self.cache.get_user(user_id).await {
            metrics::counter!("auth_user_cache_hits_total").increment(1);
            return Some(user);
        }
        metrics::counter!("auth_user_cache_misses_total").increment(1);

        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => {
                let identity = user.identity();
                if let Err(e) = self.cache.set_user(&identity).await {
                    warn!(error = %e, "Failed to cache user identity");
                }
                Some(identity)
            }
            Ok(None) => {
                debug!(%user_id, "Token refers to a user that no longer exists");
                None
            }
            Err(e) => {
                warn!(%user_id, error = %e, "User lookup failed during authentication");
                None
            }
        }
    }

    /// Drops a cached identity so the next request re-reads the store.
    pub async fn forget_user(&self, user_id: Uuid) {
        if let Err(e) = self.cache.invalidate(user_id).await {
            warn!(error = %e, "Failed to invalidate cached identity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::domain::repositories::MockUserRepository;
    use crate::infrastructure::cache::{MemoryCache, NullCache};

    const SECRET: &str = "test-jwt-secret";

    fn stored_user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "unused".to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockUserRepository) -> AuthService<MockUserRepository> {
        AuthService::new(
            Arc::new(repo),
            Arc::new(NullCache::new()),
            SECRET,
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("admin123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
        assert!(!verify_password("admin123", "not-a-phc-string"));
    }

    #[test]
    fn test_issue_and_verify_token() {
        let service = service(MockUserRepository::new());
        let user = stored_user(Role::Admin).identity();

        let token = service.issue_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.user_id, user.id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.username, "jane");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_claims_use_camel_case() {
        let claims = Claims {
            user_id: "abc".to_string(),
            role: Role::Employee,
            username: "bob".to_string(),
            iat: 1,
            exp: 2,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "abc");
        assert_eq!(json["role"], "employee");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(NullCache::new()),
            "other-secret",
            Duration::from_secs(3600),
        );
        let token = issuer
            .issue_token(&stored_user(Role::Employee).identity())
            .unwrap();

        let err = service(MockUserRepository::new())
            .verify_token(&token)
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = service(MockUserRepository::new());
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: Uuid::new_v4().to_string(),
            role: Role::Employee,
            username: "old".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.verify_token(&token).is_err());
    }

    #[tokio::test]
    async fn test_authenticate_reads_repository_on_cache_miss() {
        let user = stored_user(Role::Employee);
        let expected = user.identity();
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repo);
        let token = service.issue_token(&expected).unwrap();

        assert_eq!(service.authenticate(&token).await, Some(expected));
    }

    #[tokio::test]
    async fn test_authenticate_uses_cache_on_second_call() {
        let user = stored_user(Role::Admin);
        let expected = user.identity();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(
            Arc::new(repo),
            Arc::new(MemoryCache::new(Duration::from_secs(300), 10)),
            SECRET,
            Duration::from_secs(3600),
        );
        let token = service.issue_token(&expected).unwrap();

        assert_eq!(service.authenticate(&token).await, Some(expected.clone()));
        assert_eq!(service.authenticate(&token).await, Some(expected));
    }

    #[tokio::test]
    async fn test_authenticate_is_anonymous_for_bad_tokens() {
        let service = service(MockUserRepository::new());

        assert_eq!(service.authenticate("garbage").await, None);
        assert_eq!(service.authenticate("").await, None);
    }

    #[tokio::test]
    async fn test_authenticate_is_anonymous_for_deleted_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = service(repo);
        let token = service
            .issue_token(&stored_user(Role::Employee).identity())
            .unwrap();

        assert_eq!(service.authenticate(&token).await, None);
    }

    #[tokio::test]
    async fn test_authenticate_is_anonymous_on_storage_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = service(repo);
        let token = service
            .issue_token(&stored_user(Role::Employee).identity())
            .unwrap();

        assert_eq!(service.authenticate(&token).await, None);
    }
}
