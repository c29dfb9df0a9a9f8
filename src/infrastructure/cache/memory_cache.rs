//! In-process user-lookup cache.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::AuthenticatedUser;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

struct Entry {
    user: AuthenticatedUser,
    inserted_at: Instant,
}

/// TTL cache held in a [`DashMap`].
///
/// Entries older than `ttl` are treated as misses and removed on access.
/// When an insert pushes the map above `capacity`, expired entries are purged
/// first and then the oldest entries are evicted until the bound holds again.
pub struct MemoryCache {
    entries: DashMap<Uuid, Entry>,
    ttl: Duration,
    capacity: usize,
}

impl MemoryCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        debug!(
            "Using MemoryCache (ttl {}s, capacity {})",
            ttl.as_secs(),
            capacity
        );
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Number of entries currently held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.inserted_at) >= self.ttl
    }

    fn enforce_capacity(&self) {
        if self.entries.len() <= self.capacity {
            return;
        }

        let now = Instant::now();
        self.entries.retain(|_, entry| !self.is_expired(entry, now));

        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return;
        }

        let mut by_age: Vec<(Uuid, Instant)> = self
            .entries
            .iter()
            .map(|item| (*item.key(), item.value().inserted_at))
            .collect();
        by_age.sort_by_key(|(_, inserted_at)| *inserted_at);

        for (id, _) in by_age.into_iter().take(excess) {
            self.entries.remove(&id);
        }
        debug!("MemoryCache evicted {} entries", excess);
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_user(&self, user_id: Uuid) -> CacheResult<Option<AuthenticatedUser>> {
        let now = Instant::now();

        let hit = match self.entries.get(&user_id) {
            Some(entry) if !self.is_expired(&entry, now) => Some(entry.user.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        if hit.is_none() {
            self.entries
                .remove_if(&user_id, |_, entry| self.is_expired(entry, now));
        }

        Ok(hit)
    }

    async fn set_user(&self, user: &AuthenticatedUser) -> CacheResult<()> {
        self.entries.insert(
            user.id,
            Entry {
                user: user.clone(),
                inserted_at: Instant::now(),
            },
        );
        self.enforce_capacity();
        Ok(())
    }

    async fn invalidate(&self, user_id: Uuid) -> CacheResult<()> {
        self.entries.remove(&user_id);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;

    fn user(name: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{name}@example.com"),
            role: Role::Employee,
        }
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new(Duration::from_secs(300), 10);
        let alice = user("alice");

        cache.set_user(&alice).await.unwrap();

        assert_eq!(cache.get_user(alice.id).await.unwrap(), Some(alice));
        assert_eq!(cache.get_user(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss_and_removed() {
        let cache = MemoryCache::new(Duration::ZERO, 10);
        let alice = user("alice");

        cache.set_user(&alice).await.unwrap();

        assert_eq!(cache.get_user(alice.id).await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = MemoryCache::new(Duration::from_secs(300), 10);
        let alice = user("alice");
        cache.set_user(&alice).await.unwrap();

        cache.invalidate(alice.id).await.unwrap();

        assert_eq!(cache.get_user(alice.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let cache = MemoryCache::new(Duration::from_secs(300), 2);
        let first = user("first");
        let second = user("second");
        let third = user("third");

        cache.set_user(&first).await.unwrap();
        cache.set_user(&second).await.unwrap();
        cache.set_user(&third).await.unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_user(first.id).await.unwrap(), None);
        assert!(cache.get_user(second.id).await.unwrap().is_some());
        assert!(cache.get_user(third.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_capacity_purges_expired_first() {
        let cache = MemoryCache::new(Duration::ZERO, 1);

        for name in ["a", "b", "c"] {
            cache.set_user(&user(name)).await.unwrap();
        }

        assert!(cache.len() <= 1);
        assert_eq!(cache.backend(), "memory");
        assert!(cache.health_check().await);
    }
}
