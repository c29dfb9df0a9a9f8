//! GraphQL API: schema, resolvers, inputs and the per-request loader.
//!
//! The schema is built once at startup with the shared services as data.
//! Each request then gets its own [`CurrentUser`] and [`DataLoader`] before
//! execution, and its errors are normalized by [`errors::finalize`].

pub mod context;
pub mod errors;
pub mod inputs;
pub mod loader;
pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::{EmptySubscription, Schema, dataloader::DataLoader};

use crate::api::middleware::auth::CurrentUser;
use crate::application::services::{SharedEmployeeService, SharedUserService};
use crate::config::Environment;

pub use loader::EmployeeLoader;
pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema. Introspection stays enabled so GraphiQL works in
/// every environment.
pub fn build_schema(
    employee_service: SharedEmployeeService,
    user_service: SharedUserService,
) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(employee_service)
        .data(user_service)
        .finish()
}

/// Executes one request with the caller's identity and a fresh loader.
pub async fn execute(
    schema: &AppSchema,
    employee_service: SharedEmployeeService,
    request: async_graphql::Request,
    user: CurrentUser,
    environment: Environment,
) -> async_graphql::Response {
    let loader = DataLoader::new(EmployeeLoader::new(employee_service), tokio::spawn);
    let request = request.data(user).data(loader);

    let mut response = schema.execute(request).await;
    errors::finalize(&mut response, environment);
    response
}
