//! Cross-origin policy for browser clients.

use axum::http::{HeaderName, HeaderValue, Method, header, request::Parts};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Environment;

const APOLLO_REQUIRE_PREFLIGHT: HeaderName = HeaderName::from_static("apollo-require-preflight");

/// Creates the CORS layer.
///
/// In development every origin is reflected back. Elsewhere only the
/// configured frontend origin is allowed, compared without a trailing slash.
/// Requests without an `Origin` header are not cross-origin and pass
/// untouched. Credentials are allowed in both cases.
pub fn layer(environment: Environment, frontend_url: &str) -> CorsLayer {
    let origin = if environment.is_development() {
        AllowOrigin::mirror_request()
    } else {
        let frontend = frontend_url.trim_end_matches('/').to_string();
        AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
            is_allowed_origin(origin, &frontend)
        })
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            APOLLO_REQUIRE_PREFLIGHT,
        ])
        .allow_credentials(true)
}

fn is_allowed_origin(origin: &HeaderValue, frontend: &str) -> bool {
    origin
        .to_str()
        .map(|o| o.trim_end_matches('/') == frontend)
        .unwrap_or(false)
}
