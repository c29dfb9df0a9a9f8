//! Business logic services for the application layer.

pub mod auth_service;
pub mod employee_service;
pub mod user_service;

pub use auth_service::{AuthService, Claims};
pub use employee_service::EmployeeService;
pub use user_service::{AuthSession, Registration, UserService};

use crate::domain::repositories::{EmployeeRepository, UserRepository};
use std::sync::Arc;

/// Services over trait-object repositories, as shared through the app state.
pub type SharedEmployeeService = Arc<EmployeeService<dyn EmployeeRepository>>;
pub type SharedUserService = Arc<UserService<dyn UserRepository>>;
pub type SharedAuthService = Arc<AuthService<dyn UserRepository>>;
