//! Domain layer containing business entities and the query model.
//!
//! The domain layer is independent of infrastructure and presentation
//! concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`query`] - Filters, sorting and pagination for employee listings
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])

pub mod entities;
pub mod query;
pub mod repositories;
