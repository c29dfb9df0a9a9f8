//! Post-processing of GraphQL errors before they leave the server.

use async_graphql::{PathSegment, Response, ServerError, Value};

use crate::config::Environment;
use crate::error::codes;

const MASKED_MESSAGE: &str = "Internal server error";

/// Logs every error and normalizes its extensions.
///
/// Errors raised outside the resolvers (syntax, unknown fields, bad argument
/// types) carry no code and are tagged `INTERNAL_ERROR`. In production every
/// `INTERNAL_ERROR` message is masked and `details` are dropped.
pub fn finalize(response: &mut Response, environment: Environment) {
    for error in &mut response.errors {
        normalize(error, environment);
    }
}

fn normalize(error: &mut ServerError, environment: Environment) {
    let code = error_code(error);

    tracing::error!(
        message = %error.message,
        code = %code,
        path = %format_path(&error.path),
        "GraphQL error"
    );

    let extensions = error.extensions.get_or_insert_with(Default::default);
    if extensions.get("code").is_none() {
        extensions.set("code", codes::INTERNAL_ERROR);
        extensions.set("statusCode", 500);
    }

    if environment.is_production() {
        extensions.unset("details");
        if code == codes::INTERNAL_ERROR {
            error.message = MASKED_MESSAGE.to_string();
        }
    }
}

fn error_code(error: &ServerError) -> String {
    match error.extensions.as_ref().and_then(|ext| ext.get("code")) {
        Some(Value::String(code)) => code.clone(),
        _ => codes::INTERNAL_ERROR.to_string(),
    }
}

fn format_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(|segment| match segment {
            PathSegment::Field(name) => name.clone(),
            PathSegment::Index(index) => index.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}
