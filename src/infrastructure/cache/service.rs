//! Cache service trait and error types.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::AuthenticatedUser;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Short-lived cache from user id to the identity resolved for an access token.
///
/// Saves a database round trip on every authenticated request. Implementations
/// must be thread-safe and fail open: a broken cache degrades to repository
/// lookups, it never fails a request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process map with TTL and capacity bound
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached identity for `user_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(user))` on cache hit
    /// - `Ok(None)` on cache miss, expiry or backend error (fail-open behavior)
    async fn get_user(&self, user_id: Uuid) -> CacheResult<Option<AuthenticatedUser>>;

    /// Stores an identity under its id with the backend's TTL.
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations should log errors
    /// and return `Ok(())` to avoid disrupting the request flow.
    async fn set_user(&self, user: &AuthenticatedUser) -> CacheResult<()>;

    /// Removes a cached identity.
    async fn invalidate(&self, user_id: Uuid) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;

    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
