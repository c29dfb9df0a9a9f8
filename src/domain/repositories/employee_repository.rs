//! Repository trait for employee records.

use crate::domain::entities::{DepartmentCount, Employee, EmployeePatch, NewEmployee};
use crate::domain::query::{EmployeeFilter, EmployeeSort, PageRequest};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for managing employee records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgEmployeeRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_employee.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserts a new employee.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_employee: NewEmployee) -> Result<Employee, AppError>;

    /// Finds an employee by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError>;

    /// Loads every employee whose id is in `ids`, in no particular order.
    ///
    /// Unknown ids are skipped. Used by the per-request batch loader.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Employee>, AppError>;

    /// Finds an employee by (already lowercased) email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, AppError>;

    /// Lists one page of employees matching `filter`, ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(
        &self,
        filter: &EmployeeFilter,
        sort: EmployeeSort,
        page: PageRequest,
    ) -> Result<Vec<Employee>, AppError>;

    /// Counts employees matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, filter: &EmployeeFilter) -> Result<i64, AppError>;

    /// Applies a partial update and returns the updated row.
    ///
    /// Returns `Ok(None)` if no employee has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new email is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Option<Employee>, AppError>;

    /// Deletes an employee. Returns `Ok(false)` if no employee has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Deletes every employee and returns how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_all(&self) -> Result<u64, AppError>;

    /// Employee counts grouped by department, largest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_department(&self) -> Result<Vec<DepartmentCount>, AppError>;
}
