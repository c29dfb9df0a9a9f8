mod common;

use axum::ServiceExt;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use employee_directory::config::{Config, Environment};
use employee_directory::infrastructure::cache::MemoryCache;
use employee_directory::routes::app_router;
use employee_directory::state::AppState;
use serde_json::json;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const FRONTEND: &str = "https://app.example.com";

fn config(environment: Environment) -> Config {
    Config {
        environment,
        frontend_url: format!("{FRONTEND}/"),
        ..common::test_config()
    }
}

fn make_state(pool: PgPool, config: &Config) -> AppState {
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(300), 100));
    AppState::new(Arc::new(pool), cache, config)
}

/// Serves the full router over a real socket so the rate limiter sees a
/// peer address.
fn make_server(pool: PgPool, config: &Config) -> TestServer {
    let app = app_router(make_state(pool, config), config);

    TestServer::builder()
        .http_transport()
        .build(ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app))
        .unwrap()
}

#[sqlx::test]
async fn test_security_headers_and_trailing_slash(pool: PgPool) {
    let server = make_server(pool, &config(Environment::Production));

    let response = server.get("/health/").await;

    response.assert_status_ok();
    response.assert_header("x-content-type-options", "nosniff");
    response.assert_header("x-frame-options", "SAMEORIGIN");
    response.assert_header("referrer-policy", "no-referrer");
}

#[sqlx::test]
async fn test_router_oneshot_without_socket(pool: PgPool) {
    let config = config(Environment::Test);
    let app = app_router(make_state(pool, &config), &config);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[sqlx::test]
async fn test_cors_production_allows_only_frontend(pool: PgPool) {
    let server = make_server(pool, &config(Environment::Production));

    let allowed = server.get("/health").add_header("Origin", FRONTEND).await;
    allowed.assert_status_ok();
    allowed.assert_header("access-control-allow-origin", FRONTEND);
    allowed.assert_header("access-control-allow-credentials", "true");

    let foreign = server
        .get("/health")
        .add_header("Origin", "https://evil.example.com")
        .await;
    assert!(foreign.maybe_header("access-control-allow-origin").is_none());

    let no_origin = server.get("/health").await;
    no_origin.assert_status_ok();
    assert!(no_origin.maybe_header("access-control-allow-origin").is_none());
}

#[sqlx::test]
async fn test_cors_preflight_for_graphql(pool: PgPool) {
    let server = make_server(pool, &config(Environment::Production));

    let response = server
        .method(Method::OPTIONS, "/graphql")
        .add_header("Origin", FRONTEND)
        .add_header("Access-Control-Request-Method", "POST")
        .add_header(
            "Access-Control-Request-Headers",
            "content-type,authorization,apollo-require-preflight",
        )
        .await;

    response.assert_header("access-control-allow-origin", FRONTEND);
    let methods = response.header("access-control-allow-methods");
    assert!(methods.to_str().unwrap().contains("POST"));
    let headers = response.header("access-control-allow-headers");
    assert!(headers.to_str().unwrap().contains("apollo-require-preflight"));
}

#[sqlx::test]
async fn test_cors_development_mirrors_any_origin(pool: PgPool) {
    let server = make_server(pool, &config(Environment::Development));

    let response = server
        .get("/health")
        .add_header("Origin", "http://localhost:5173")
        .await;

    response.assert_header("access-control-allow-origin", "http://localhost:5173");
}

#[sqlx::test]
async fn test_graphql_rate_limit_after_burst(pool: PgPool) {
    let server = make_server(pool, &config(Environment::Test));
    let body = json!({ "query": "{ __typename }" });

    let mut first_limited = None;
    for attempt in 0..120 {
        let response = server.post("/graphql").json(&body).await;
        if response.status_code() == StatusCode::TOO_MANY_REQUESTS {
            first_limited = Some(attempt);
            break;
        }
        response.assert_status_ok();
    }

    let first_limited = first_limited.expect("burst should be exhausted within 120 requests");
    assert!(first_limited >= 95, "limited too early at {first_limited}");

    server.get("/health").await.assert_status_ok();
}
