//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Queries
//! are checked at runtime; the schema lives in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgEmployeeRepository`] - Employee CRUD and filtered listing
//! - [`PgUserRepository`] - User accounts

pub mod pg_employee_repository;
pub mod pg_user_repository;

pub use pg_employee_repository::PgEmployeeRepository;
pub use pg_user_repository::PgUserRepository;
