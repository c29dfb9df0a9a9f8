//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, cache setup and the Axum server
//! lifecycle.

use crate::config::{Config, mask_connection_string};
use crate::infrastructure::cache::{CacheService, MemoryCache, RedisCache};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;

const CONNECT_ATTEMPTS: usize = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (retried on startup)
/// - Apply migrations
/// - User-lookup cache (Redis when configured, in-memory otherwise)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails after all attempts
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let cache = build_cache(&config).await;

    let state = AppState::new(Arc::new(pool.clone()), cache, &config);
    let app = app_router(state, &config);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");
    tracing::info!("GraphQL endpoint: http://{addr}/graphql");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Builds the connection pool from the configured limits and timeouts.
pub fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
}

/// Connects to PostgreSQL, retrying every 5 seconds up to 5 attempts.
///
/// # Errors
///
/// Returns the last connection error once all attempts failed.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let masked = mask_connection_string(&config.database_url);
    let pool = Retry::start(retry_schedule(CONNECT_RETRY_DELAY), || async {
        pool_options(config)
            .connect(&config.database_url)
            .await
            .inspect_err(|e| tracing::warn!(database = %masked, error = %e, "Database connection failed"))
    })
    .await
    .with_context(|| format!("Could not connect to database after {CONNECT_ATTEMPTS} attempts"))?;

    tracing::info!(database = %masked, "Connected to database");
    Ok(pool)
}

/// Delays between connection attempts: `CONNECT_ATTEMPTS - 1` waits of `delay`.
fn retry_schedule(delay: Duration) -> impl Iterator<Item = Duration> {
    FixedInterval::new(delay).take(CONNECT_ATTEMPTS - 1)
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let memory = || -> Arc<dyn CacheService> {
        Arc::new(MemoryCache::new(
            config.user_cache_ttl(),
            config.user_cache_capacity,
        ))
    };

    let Some(redis_url) = &config.redis_url else {
        tracing::info!("User cache: in-memory");
        return memory();
    };

    match RedisCache::connect(redis_url, config.user_cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("User cache: Redis");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using in-memory cache.", e);
            memory()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_retry_schedule() {
        let delays: Vec<Duration> = retry_schedule(CONNECT_RETRY_DELAY).collect();

        assert_eq!(delays, vec![Duration::from_secs(5); 4]);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_all_attempts() {
        let attempts = AtomicUsize::new(0);

        let result: Result<(), &str> = Retry::start(retry_schedule(Duration::ZERO), || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err("connection refused")
        })
        .await;

        assert_eq!(result, Err("connection refused"));
        assert_eq!(attempts.load(Ordering::SeqCst), CONNECT_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_retry_stops_on_first_success() {
        let attempts = AtomicUsize::new(0);

        let result: Result<usize, &str> = Retry::start(retry_schedule(Duration::ZERO), || async {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt < 3 {
                Err("not yet")
            } else {
                Ok(attempt)
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
