//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Employee`] - A directory record
//! - [`User`] - An account that can sign in
//! - [`AuthenticatedUser`] - The public identity attached to a request
//!
//! # Design Pattern
//!
//! Entities have separate structs for creation and partial updates:
//! - `NewEmployee`, `NewUser` - For creating new records
//! - `EmployeePatch` - For partial updates

pub mod employee;
pub mod user;

pub use employee::{DepartmentCount, Employee, EmployeePatch, NewEmployee};
pub use user::{AuthenticatedUser, NewUser, Role, UnknownRole, User};
