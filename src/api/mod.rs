//! API layer: the GraphQL endpoint, the health check and HTTP middleware.
//!
//! This layer translates HTTP requests into application service calls and
//! formats responses according to the API contract.
//!
//! # Modules
//!
//! - [`dto`] - response bodies of the plain HTTP endpoints
//! - [`graphql`] - schema, resolvers, inputs and the employee loader
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - identification, rate limiting, CORS and tracing
//! - [`routes`] - route configuration

pub mod dto;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod routes;
