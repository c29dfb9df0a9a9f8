//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// One token every 9 seconds.
const REPLENISH_SECONDS: u64 = 9;
/// Roughly 100 requests per 15 minutes once the burst is spent.
const BURST_SIZE: u32 = 100;

fn config<K: KeyExtractor>(extractor: K) -> Arc<GovernorConfig<K, NoOpMiddleware<QuantaInstant>>> {
    Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(extractor)
            .per_second(REPLENISH_SECONDS)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limit period and burst are non-zero"),
    )
}

/// Creates the rate limiter for the GraphQL endpoint.
///
/// # Limits
///
/// - **Rate**: 1 request per 9 seconds
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/graphql", post(graphql_handler))
///     .layer(rate_limit::layer());
/// ```
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    GovernorLayer::new(config(PeerIpKeyExtractor))
}

/// Same limits as [`layer`], keyed by the client IP taken from
/// `X-Forwarded-For`, `X-Real-Ip` or `Forwarded`, falling back to the peer
/// address.
///
/// Only use behind a trusted reverse proxy; otherwise clients can pick their
/// own key.
pub fn proxy_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    GovernorLayer::new(config(SmartIpKeyExtractor))
}
