//! Request identity and role gating for resolvers.

use async_graphql::Context;
use serde_json::json;
use uuid::Uuid;

use crate::api::middleware::auth::CurrentUser;
use crate::domain::entities::{AuthenticatedUser, Role};
use crate::error::AppError;

/// Returns the identity attached to the request, if any.
pub fn current_user<'a>(ctx: &Context<'a>) -> Option<&'a AuthenticatedUser> {
    ctx.data_opt::<CurrentUser>().and_then(|c| c.0.as_ref())
}

/// # Errors
///
/// Returns [`AppError::Unauthorized`] ("Not authenticated") for anonymous
/// requests.
pub fn require_auth<'a>(ctx: &Context<'a>) -> Result<&'a AuthenticatedUser, AppError> {
    current_user(ctx).ok_or_else(|| AppError::unauthorized("Not authenticated", json!({})))
}

/// # Errors
///
/// Returns [`AppError::Unauthorized`] for anonymous requests and
/// [`AppError::Forbidden`] ("Insufficient permissions") when the user's role
/// is not in `roles`.
pub fn require_role<'a>(
    ctx: &Context<'a>,
    roles: &[Role],
) -> Result<&'a AuthenticatedUser, AppError> {
    let user = require_auth(ctx)?;
    if !roles.contains(&user.role) {
        tracing::warn!(user_id = %user.id, role = %user.role, "Permission denied");
        return Err(AppError::forbidden("Insufficient permissions", json!({})));
    }
    Ok(user)
}

/// Parses a client-supplied employee id.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when `id` is not a UUID.
pub fn parse_employee_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim())
        .map_err(|_| AppError::bad_request("Invalid employee ID", json!({ "id": id })))
}
