//! User-lookup cache used while authenticating requests.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`MemoryCache`] - Default in-process cache with TTL and capacity bound
//! - [`RedisCache`] - Shared Redis-backed cache
//! - [`NullCache`] - No-op implementation for testing/disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
