//! GraphQL endpoint and the GraphiQL IDE.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension,
    extract::State,
    response::{Html, IntoResponse},
};

use crate::api::graphql;
use crate::api::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Executes a GraphQL request.
///
/// # Endpoint
///
/// `POST /graphql`
///
/// The response is always `200 OK`; failures are reported in the `errors`
/// array with `extensions.code` and `extensions.statusCode`.
pub async fn graphql_handler(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let user = user.map(|Extension(u)| u).unwrap_or_default();

    graphql::execute(
        &state.schema,
        state.employee_service.clone(),
        req.into_inner(),
        user,
        state.environment,
    )
    .await
    .into()
}

/// Serves the GraphiQL IDE.
///
/// # Endpoint
///
/// `GET /graphql`
pub async fn graphiql_handler() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
