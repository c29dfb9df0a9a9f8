//! Redis-backed user-lookup cache.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::AuthenticatedUser;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Redis cache implementation shared by every instance of the service.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Identities are stored as JSON with `SET EX`. All operations are fail-open:
/// errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    ttl_seconds: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        info!(
            "Connecting to Redis at {}",
            crate::config::mask_connection_string(redis_url)
        );

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            ttl_seconds,
            key_prefix: "user:".to_string(),
        })
    }

    fn build_key(&self, user_id: Uuid) -> String {
        format!("{}{}", self.key_prefix, user_id)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_user(&self, user_id: Uuid) -> CacheResult<Option<AuthenticatedUser>> {
        let key = self.build_key(user_id);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(user) => {
                    debug!("Cache HIT: {}", user_id);
                    Ok(Some(user))
                }
                Err(e) => {
                    warn!("Discarding malformed cache entry {}: {}", key, e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", user_id);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", user_id, e);
                Ok(None)
            }
        }
    }

    async fn set_user(&self, user: &AuthenticatedUser) -> CacheResult<()> {
        let key = self.build_key(user.id);
        let payload = serde_json::to_string(user)
            .map_err(|e| CacheError::OperationError(e.to_string()))?;
        let mut conn = self.client.clone();

        match conn
            .set_ex::<_, _, ()>(&key, payload, self.ttl_seconds)
            .await
        {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", user.id, self.ttl_seconds);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", user.id, e);
                Ok(())
            }
        }
    }

    async fn invalidate(&self, user_id: Uuid) -> CacheResult<()> {
        let key = self.build_key(user_id);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", user_id);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", user_id, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
