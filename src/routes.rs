//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check: database and user cache (public)
//! - `GET  /graphql`  - GraphiQL IDE
//! - `POST /graphql`  - GraphQL API (bearer token optional)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Frontend origin policy
//! - **Security headers** - `nosniff`, `SAMEORIGIN`, `no-referrer`
//! - **Rate limiting** - Per-IP token bucket on `/graphql`
//! - **Identification** - Bearer token resolved to the current user
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, cors, rate_limit, security_headers, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `config` - CORS origin and proxy settings; with `behind_proxy`, rate
///   limiting reads the client IP from forwarding headers instead of the
///   peer socket address
pub fn app_router(state: AppState, config: &Config) -> NormalizePath<Router> {
    let graphql = api::routes::graphql_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let graphql = if config.behind_proxy {
        graphql.layer(rate_limit::proxy_layer())
    } else {
        graphql.layer(rate_limit::layer())
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(graphql)
        .with_state(state)
        .layer(security_headers::layer())
        .layer(cors::layer(config.environment, &config.frontend_url))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
