//! GraphQL route configuration.

use crate::api::handlers::{graphiql_handler, graphql_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// The GraphQL endpoint.
///
/// # Endpoints
///
/// - `GET  /graphql` - GraphiQL IDE
/// - `POST /graphql` - query and mutation execution
pub fn graphql_routes() -> Router<AppState> {
    Router::new().route("/graphql", get(graphiql_handler).post(graphql_handler))
}
