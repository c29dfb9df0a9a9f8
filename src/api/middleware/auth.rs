//! Bearer token identification middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::domain::entities::AuthenticatedUser;
use crate::state::AppState;

/// Identity resolved for the current request. `None` means anonymous.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<AuthenticatedUser>);

/// Resolves the caller from the `Authorization` header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// The layer never rejects a request. A missing, malformed or expired token,
/// or one whose user no longer exists, leaves the request anonymous; resolvers
/// decide whether that is acceptable. The result is stored as a
/// [`CurrentUser`] request extension.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/graphql", post(graphql_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let user = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => st.auth_service.authenticate(&token).await,
        Err(_) => None,
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(CurrentUser(user));

    next.run(req).await
}
