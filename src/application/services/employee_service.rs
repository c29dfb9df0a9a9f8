//! Employee directory business rules.

use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{DepartmentCount, Employee, EmployeePatch, NewEmployee};
use crate::domain::query::{EmployeeFilter, EmployeePage, EmployeeSort, PageRequest, PaginationInfo};
use crate::domain::repositories::EmployeeRepository;
use crate::error::AppError;

const EMAIL_TAKEN: &str = "Employee with this email already exists";

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Employee not found", json!({"id": id.to_string()}))
}

/// Service for listing and maintaining employee records.
///
/// Inputs arrive validated and normalized from the API layer; the service
/// enforces existence and email uniqueness.
pub struct EmployeeService<R: EmployeeRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: EmployeeRepository + ?Sized> EmployeeService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns one page of employees and the pagination metadata.
    ///
    /// Text filters are sanitized first. The page and the total count are
    /// queried concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(
        &self,
        filter: EmployeeFilter,
        sort: EmployeeSort,
        page: PageRequest,
    ) -> Result<EmployeePage, AppError> {
        let filter = filter.sanitized();

        let (employees, total) = tokio::try_join!(
            self.repository.list(&filter, sort, page),
            self.repository.count(&filter),
        )?;

        Ok(EmployeePage {
            employees,
            pagination: PaginationInfo::new(&page, total),
        })
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] ("Employee not found") for unknown ids.
    pub async fn get(&self, id: Uuid) -> Result<Employee, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Loads a batch of employees by id. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Employee>, AppError> {
        self.repository.find_by_ids(ids).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already used by another
    /// employee.
    pub async fn create(&self, new_employee: NewEmployee) -> Result<Employee, AppError> {
        if self
            .repository
            .find_by_email(&new_employee.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(EMAIL_TAKEN, json!({})));
        }

        let employee = self.repository.create(new_employee).await?;
        info!(employee_id = %employee.id, "Employee created");
        Ok(employee)
    }

    /// Applies a partial update.
    ///
    /// Email collisions are left to the `employees_email_key` constraint, so
    /// an unknown id is reported before a taken email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown ids and
    /// [`AppError::Conflict`] if the new email belongs to someone else.
    pub async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Employee, AppError> {
        let employee = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(employee_id = %employee.id, "Employee updated");
        Ok(employee)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown ids.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }

        info!(employee_id = %id, "Employee deleted");
        Ok(true)
    }

    /// Total number of employees.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count(&EmployeeFilter::default()).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn department_breakdown(&self) -> Result<Vec<DepartmentCount>, AppError> {
        self.repository.count_by_department().await
    }

    /// Removes every employee. Used when reseeding.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_all(&self) -> Result<u64, AppError> {
        self.repository.delete_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{SortField, SortOrder};
    use crate::domain::repositories::MockEmployeeRepository;
    use chrono::Utc;

    fn employee(name: &str, email: &str) -> Employee {
        let now = Utc::now();
        Employee {
            id: Uuid::new_v4(),
            name: name.to_string(),
            age: 30,
            class_name: "Engineering".to_string(),
            subjects: vec!["Mathematics".to_string()],
            attendance: 95.0,
            email: email.to_string(),
            department: Some("IT".to_string()),
            position: None,
            salary: None,
            join_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_employee(email: &str) -> NewEmployee {
        NewEmployee {
            name: "John Smith".to_string(),
            age: 32,
            class_name: "Engineering".to_string(),
            subjects: vec!["Physics".to_string()],
            attendance: 95.0,
            email: email.to_string(),
            department: None,
            position: None,
            salary: None,
        }
    }

    #[tokio::test]
    async fn test_list_sanitizes_filter_and_builds_pagination() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_list()
            .withf(|filter, sort, page| {
                filter.name.as_deref() == Some("John")
                    && filter.department.is_none()
                    && sort.field == SortField::Name
                    && page.offset() == 10
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![employee("John Smith", "john@example.com")]));
        repo.expect_count()
            .withf(|filter| filter.name.as_deref() == Some("John"))
            .times(1)
            .returning(|_| Ok(11));

        let service = EmployeeService::new(Arc::new(repo));
        let filter = EmployeeFilter {
            name: Some(" <b>John</b> ".to_string()),
            department: Some("  ".to_string()),
            ..Default::default()
        };

        let page = service
            .list(
                filter,
                EmployeeSort::new(SortField::Name, SortOrder::Asc),
                PageRequest::new(Some(2), Some(10)),
            )
            .await
            .unwrap();

        assert_eq!(page.employees.len(), 1);
        assert_eq!(page.pagination.total, 11);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_next_page);
        assert!(page.pagination.has_previous_page);
    }

    #[tokio::test]
    async fn test_list_propagates_count_failure() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_list().returning(|_, _, _| Ok(vec![]));
        repo.expect_count()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = EmployeeService::new(Arc::new(repo));
        let result = service
            .list(
                EmployeeFilter::default(),
                EmployeeSort::default(),
                PageRequest::default(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let err = EmployeeService::new(Arc::new(repo))
            .get(Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_string(), "Employee not found");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "john@example.com")
            .times(1)
            .returning(|_| Ok(Some(employee("John", "john@example.com"))));
        repo.expect_create().times(0);

        let err = EmployeeService::new(Arc::new(repo))
            .create(new_employee("john@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), "Employee with this email already exists");
    }

    #[tokio::test]
    async fn test_create_success() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_email().times(1).returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|new| Ok(employee(&new.name, &new.email)));

        let created = EmployeeService::new(Arc::new(repo))
            .create(new_employee("john@example.com"))
            .await
            .unwrap();

        assert_eq!(created.name, "John Smith");
    }

    #[tokio::test]
    async fn test_update_allows_keeping_own_email() {
        let current = employee("John", "john@example.com");
        let id = current.id;

        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_email().times(0);
        repo.expect_update()
            .withf(move |update_id, patch| *update_id == id && patch.age == Some(41))
            .times(1)
            .returning(move |_, _| Ok(Some(current.clone())));

        let patch = EmployeePatch {
            email: Some("john@example.com".to_string()),
            age: Some(41),
            ..Default::default()
        };

        let result = EmployeeService::new(Arc::new(repo)).update(id, patch).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_passes_email_conflict_through() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_update()
            .times(1)
            .returning(|_, _| Err(AppError::conflict(EMAIL_TAKEN, json!({}))));

        let patch = EmployeePatch {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        };

        let err = EmployeeService::new(Arc::new(repo))
            .update(Uuid::new_v4(), patch)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), EMAIL_TAKEN);
    }

    #[tokio::test]
    async fn test_update_missing_employee_with_taken_email_is_not_found() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(employee("Other", "taken@example.com"))));
        repo.expect_update().times(1).returning(|_, _| Ok(None));

        let patch = EmployeePatch {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        };

        let err = EmployeeService::new(Arc::new(repo))
            .update(Uuid::new_v4(), patch)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_string(), "Employee not found");
    }

    #[tokio::test]
    async fn test_update_missing_employee() {
        let mut repo = MockEmployeeRepository::new();
        repo.expect_update().times(1).returning(|_, _| Ok(None));

        let patch = EmployeePatch {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };

        let err = EmployeeService::new(Arc::new(repo))
            .update(Uuid::new_v4(), patch)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let mut repo = MockEmployeeRepository::new();
        let existing = Uuid::new_v4();
        repo.expect_delete()
            .returning(move |id| Ok(id == existing));

        let service = EmployeeService::new(Arc::new(repo));

        assert!(service.delete(existing).await.unwrap());
        let err = service.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
