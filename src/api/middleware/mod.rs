//! HTTP middleware for request processing and protection.
//!
//! Provides caller identification, rate limiting, CORS, security headers
//! and request tracing.

pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod security_headers;
pub mod tracing;
