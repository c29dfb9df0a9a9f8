//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::AuthenticatedUser;
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

/// A cache implementation that does nothing.
///
/// Every lookup is a miss, so each authenticated request reads the user
/// from the database.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (user cache disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_user(&self, _user_id: Uuid) -> CacheResult<Option<AuthenticatedUser>> {
        Ok(None)
    }

    async fn set_user(&self, _user: &AuthenticatedUser) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _user_id: Uuid) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}
