//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{SecondsFormat, Utc};

use crate::api::dto::health::{CacheStatus, DatabaseStatus, HealthResponse};
use crate::config::Environment;
use crate::state::AppState;

const MASKED_DATABASE_MESSAGE: &str = "Database unavailable";

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: database and cache healthy
/// - **503 Service Unavailable**: either one failed
///
/// # Response
///
/// ```json
/// {
///   "status": "ok",
///   "timestamp": "2025-01-02T03:04:05.678Z",
///   "uptime_seconds": 3600,
///   "version": "0.1.0",
///   "environment": "production",
///   "database": { "status": "connected" },
///   "cache": { "status": "ok", "backend": "memory" }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state).await;
    let cache = check_cache(&state).await;

    let healthy = database.status == "connected" && cache.status == "ok";

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.environment.as_str(),
        database,
        cache,
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

async fn check_database(state: &AppState) -> DatabaseStatus {
    match sqlx::query("SELECT 1").execute(state.db.as_ref()).await {
        Ok(_) => DatabaseStatus {
            status: "connected",
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            DatabaseStatus {
                status: "disconnected",
                message: Some(database_message(state.environment, &e)),
            }
        }
    }
}

/// The driver error text is only reported outside production.
fn database_message(environment: Environment, error: &sqlx::Error) -> String {
    if environment.is_production() {
        MASKED_DATABASE_MESSAGE.to_string()
    } else {
        format!("Database error: {error}")
    }
}

async fn check_cache(state: &AppState) -> CacheStatus {
    let backend = state.cache.backend();
    let status = if state.cache.health_check().await {
        "ok"
    } else {
        tracing::warn!(backend, "Health check: cache unreachable");
        "error"
    };

    CacheStatus { status, backend }
}
