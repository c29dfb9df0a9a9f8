//! DTOs for health check endpoint.

use serde::Serialize;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: &'static str,
    pub environment: &'static str,
    pub database: DatabaseStatus,
    pub cache: CacheStatus,
}

#[derive(Debug, Serialize)]
pub struct DatabaseStatus {
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub status: &'static str,
    pub backend: &'static str,
}
