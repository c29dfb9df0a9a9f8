//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls
//! and business rules. Services are generic over the repository traits so the
//! server can run them on trait objects and tests on mocks.
//!
//! # Available Services
//!
//! - [`services::employee_service::EmployeeService`] - Listing and maintaining employee records
//! - [`services::user_service::UserService`] - Registration, login and account lookups
//! - [`services::auth_service::AuthService`] - Password hashing, JWTs and request identity

pub mod services;
