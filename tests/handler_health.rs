mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use employee_directory::api::handlers::health_handler;
use employee_directory::config::{Config, Environment};
use employee_directory::infrastructure::cache::MemoryCache;
use employee_directory::state::AppState;

fn make_server(pool: PgPool) -> TestServer {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_health_endpoint_success(pool: PgPool) {
    let server = make_server(pool);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["environment"], "test");
    assert_eq!(json["database"]["status"], "connected");
    assert_eq!(json["cache"]["status"], "ok");
    assert_eq!(json["cache"]["backend"], "memory");
}

#[sqlx::test]
async fn test_health_endpoint_structure(pool: PgPool) {
    let server = make_server(pool);

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(json["uptime_seconds"].is_u64());
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["database"].get("message").is_none());
}

#[sqlx::test]
async fn test_health_endpoint_database_down(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    pool.close().await;

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"]["status"], "disconnected");
    assert!(json["database"]["message"].is_string());
}

#[sqlx::test]
async fn test_health_endpoint_masks_database_error_in_production(pool: PgPool) {
    let config = Config {
        environment: Environment::Production,
        ..common::test_config()
    };
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(300), 100));
    let state = AppState::new(Arc::new(pool.clone()), cache, &config);
    pool.close().await;

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["environment"], "production");
    assert_eq!(json["database"]["message"], "Database unavailable");
}
