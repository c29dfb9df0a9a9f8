//! Application error type shared by services, repositories and the API layer.
//!
//! Every failure surfaced to a client falls into one of six kinds, each with a
//! fixed machine-readable code and HTTP status:
//!
//! | Variant          | Code                   | Status |
//! |------------------|------------------------|--------|
//! | `Validation`     | `VALIDATION_ERROR`     | 400    |
//! | `Unauthorized`   | `AUTHENTICATION_ERROR` | 401    |
//! | `Forbidden`      | `AUTHORIZATION_ERROR`  | 403    |
//! | `NotFound`       | `NOT_FOUND`            | 404    |
//! | `Conflict`       | `CONFLICT`             | 409    |
//! | `Internal`       | `INTERNAL_ERROR`       | 500    |
//!
//! Over GraphQL the code and status travel in the error `extensions`
//! (see [`ErrorExtensions`]); over plain HTTP they become the response status
//! and a JSON body.

use async_graphql::ErrorExtensions;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use validator::ValidationErrors;

use crate::utils::db_error::conflict_message;

/// Machine-readable error codes.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const AUTHENTICATION_ERROR: &str = "AUTHENTICATION_ERROR";
    pub const AUTHORIZATION_ERROR: &str = "AUTHORIZATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload used in HTTP responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    Unauthorized { message: String, details: Value },
    #[error("{message}")]
    Forbidden { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns the machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => codes::VALIDATION_ERROR,
            Self::Unauthorized { .. } => codes::AUTHENTICATION_ERROR,
            Self::Forbidden { .. } => codes::AUTHORIZATION_ERROR,
            Self::NotFound { .. } => codes::NOT_FOUND,
            Self::Conflict { .. } => codes::CONFLICT,
            Self::Internal { .. } => codes::INTERNAL_ERROR,
        }
    }

    /// Returns the HTTP status associated with this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            Self::Validation { details, .. }
            | Self::Unauthorized { details, .. }
            | Self::Forbidden { details, .. }
            | Self::NotFound { details, .. }
            | Self::Conflict { details, .. }
            | Self::Internal { details, .. } => details,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details().clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        let status = i32::from(self.status().as_u16());
        let details = self.details().clone();

        async_graphql::Error::new(self.to_string()).extend_with(move |_, ext| {
            ext.set("code", code);
            ext.set("statusCode", status);
            if has_details(&details)
                && let Ok(value) = async_graphql::Value::from_json(details)
            {
                ext.set("details", value);
            }
        })
    }
}

fn has_details(details: &Value) -> bool {
    match details {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                conflict_message(db.constraint()),
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

/// Flattens field-level validation failures into a single message:
/// `Validation error: age: Age must be at least 18, name: ...`.
///
/// Field names are reported in their GraphQL spelling and sorted so the
/// message is deterministic.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<(String, Vec<String>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", err.code))
                    })
                    .collect();
                (field_label(&field), messages)
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect::<Vec<_>>()
            .join(", ");

        let details: Map<String, Value> = fields
            .into_iter()
            .map(|(field, messages)| (field, json!(messages)))
            .collect();

        AppError::bad_request(
            format!("Validation error: {message}"),
            Value::Object(details),
        )
    }
}

/// Maps a Rust field name to the name clients see in the schema.
fn field_label(field: &str) -> String {
    if field == "class_name" {
        return "class".to_string();
    }

    let mut label = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = !label.is_empty();
        } else if upper_next {
            label.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            label.push(ch);
        }
    }
    label
}
