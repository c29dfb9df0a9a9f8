//! GraphQL input types and their validation rules.
//!
//! Inputs are normalized (trimmed, emails lowercased) before validation, then
//! converted into domain values.

use async_graphql::InputObject;
use serde_json::json;
use validator::{Validate, ValidationError};

use crate::domain::entities::{EmployeePatch, NewEmployee, Role};
use crate::domain::query::{EmployeeFilter, EmployeeSort};
use crate::error::AppError;

fn validate_subjects(subjects: &Vec<String>) -> Result<(), ValidationError> {
    if subjects.iter().any(|s| s.is_empty()) {
        let mut err = ValidationError::new("subject_empty");
        err.message = Some("Subject cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role.parse::<Role>().is_err() {
        let mut err = ValidationError::new("role");
        err.message = Some("Role must be 'admin' or 'employee'".into());
        return Err(err);
    }
    Ok(())
}

fn trim_email(email: String) -> String {
    email.trim().to_lowercase()
}

fn trim_subjects(subjects: Vec<String>) -> Vec<String> {
    subjects.into_iter().map(|s| s.trim().to_string()).collect()
}

fn trim_owned(value: String) -> String {
    value.trim().to_string()
}

/// Trims an optional text column; blank values become `None`.
fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(trim_owned)
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, InputObject, Validate)]
#[graphql(name = "EmployeeInput")]
pub struct EmployeeInput {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: i32,
    #[graphql(name = "class")]
    #[validate(length(min = 1, max = 50, message = "Class must be between 1 and 50 characters"))]
    pub class_name: String,
    #[validate(
        length(min = 1, message = "At least one subject is required"),
        custom(function = "validate_subjects")
    )]
    pub subjects: Vec<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "Attendance must be between 0 and 100"))]
    pub attendance: f64,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(max = 100, message = "Department must be less than 100 characters"))]
    pub department: Option<String>,
    #[validate(length(max = 100, message = "Position must be less than 100 characters"))]
    pub position: Option<String>,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: Option<f64>,
}

impl EmployeeInput {
    /// Normalizes and validates the input.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] listing every failed field.
    pub fn into_new_employee(self) -> Result<NewEmployee, AppError> {
        let input = Self {
            name: trim_owned(self.name),
            class_name: trim_owned(self.class_name),
            subjects: trim_subjects(self.subjects),
            email: trim_email(self.email),
            department: trim_optional(self.department),
            position: trim_optional(self.position),
            ..self
        };
        input.validate()?;

        Ok(NewEmployee {
            name: input.name,
            age: input.age,
            class_name: input.class_name,
            subjects: input.subjects,
            attendance: input.attendance,
            email: input.email,
            department: input.department,
            position: input.position,
            salary: input.salary,
        })
    }
}

/// Partial update. Omitted fields are left unchanged; a blank `department`
/// or `position` clears the column.
#[derive(Debug, Clone, Default, InputObject, Validate)]
#[graphql(name = "EmployeeUpdateInput")]
pub struct EmployeeUpdateInput {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 18, max = 100, message = "Age must be between 18 and 100"))]
    pub age: Option<i32>,
    #[graphql(name = "class")]
    #[validate(length(min = 1, max = 50, message = "Class must be between 1 and 50 characters"))]
    pub class_name: Option<String>,
    #[validate(
        length(min = 1, message = "At least one subject is required"),
        custom(function = "validate_subjects")
    )]
    pub subjects: Option<Vec<String>>,
    #[validate(range(min = 0.0, max = 100.0, message = "Attendance must be between 0 and 100"))]
    pub attendance: Option<f64>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 100, message = "Department must be less than 100 characters"))]
    pub department: Option<String>,
    #[validate(length(max = 100, message = "Position must be less than 100 characters"))]
    pub position: Option<String>,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: Option<f64>,
}

impl EmployeeUpdateInput {
    /// Normalizes and validates the present fields.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] listing every failed field.
    pub fn into_patch(self) -> Result<EmployeePatch, AppError> {
        let input = Self {
            name: self.name.map(trim_owned),
            class_name: self.class_name.map(trim_owned),
            subjects: self.subjects.map(trim_subjects),
            email: self.email.map(trim_email),
            department: self.department.map(trim_owned),
            position: self.position.map(trim_owned),
            ..self
        };
        input.validate()?;

        Ok(EmployeePatch {
            name: input.name,
            age: input.age,
            class_name: input.class_name,
            subjects: input.subjects,
            attendance: input.attendance,
            email: input.email,
            department: input.department.map(|d| Some(d).filter(|d| !d.is_empty())),
            position: input.position.map(|p| Some(p).filter(|p| !p.is_empty())),
            salary: input.salary.map(Some),
        })
    }
}

#[derive(Debug, Clone, Default, InputObject, Validate)]
#[graphql(name = "EmployeeFilters")]
pub struct EmployeeFiltersInput {
    pub name: Option<String>,
    #[graphql(name = "class")]
    pub class_name: Option<String>,
    pub department: Option<String>,
    #[validate(range(min = 18, message = "Minimum age must be at least 18"))]
    pub min_age: Option<i32>,
    #[validate(range(max = 100, message = "Maximum age must be at most 100"))]
    pub max_age: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0, message = "Attendance must be between 0 and 100"))]
    pub min_attendance: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Attendance must be between 0 and 100"))]
    pub max_attendance: Option<f64>,
}

impl EmployeeFiltersInput {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for out-of-range bounds.
    pub fn into_filter(self) -> Result<EmployeeFilter, AppError> {
        self.validate()?;

        Ok(EmployeeFilter {
            name: self.name,
            class_name: self.class_name,
            department: self.department,
            min_age: self.min_age,
            max_age: self.max_age,
            min_attendance: self.min_attendance,
            max_attendance: self.max_attendance,
        })
    }
}

#[derive(Debug, Clone, InputObject)]
#[graphql(name = "SortInput")]
pub struct SortInput {
    pub field: String,
    pub order: String,
}

impl SortInput {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a field outside the sortable set
    /// or an order other than `ASC`/`DESC`.
    pub fn into_sort(self) -> Result<EmployeeSort, AppError> {
        EmployeeSort::parse(self.field.trim(), self.order.trim()).map_err(|e| {
            AppError::bad_request(
                format!("Validation error: sort: {e}"),
                json!({ "sort": [e.to_string()] }),
            )
        })
    }
}

/// Arguments of the `register` mutation.
#[derive(Debug, Clone, Validate)]
pub struct RegisterArgs {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    pub password: String,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl RegisterArgs {
    pub fn new(username: String, email: String, password: String, role: Option<String>) -> Self {
        Self {
            username: username.trim().to_lowercase(),
            email: trim_email(email),
            password,
            role: role.map(trim_owned),
        }
    }

    /// Role to assign; `employee` when none was requested.
    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .unwrap_or_default()
    }
}

/// Arguments of the `login` mutation.
#[derive(Debug, Clone, Validate)]
pub struct LoginArgs {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> EmployeeInput {
        EmployeeInput {
            name: "John Smith".to_string(),
            age: 32,
            class_name: "Engineering".to_string(),
            subjects: vec!["Mathematics".to_string()],
            attendance: 95.0,
            email: "John.Smith@Example.com".to_string(),
            department: Some("IT".to_string()),
            position: None,
            salary: Some(95000.0),
        }
    }

    #[test]
    fn test_valid_input_is_normalized() {
        let input = EmployeeInput {
            name: "  John Smith ".to_string(),
            subjects: vec![" Physics ".to_string()],
            department: Some("   ".to_string()),
            ..valid_input()
        };

        let employee = input.into_new_employee().unwrap();

        assert_eq!(employee.name, "John Smith");
        assert_eq!(employee.email, "john.smith@example.com");
        assert_eq!(employee.subjects, vec!["Physics".to_string()]);
        assert_eq!(employee.department, None);
    }

    #[test]
    fn test_boundaries() {
        let ok = [
            EmployeeInput { name: "Jo".to_string(), ..valid_input() },
            EmployeeInput { name: "x".repeat(100), ..valid_input() },
            EmployeeInput { age: 18, ..valid_input() },
            EmployeeInput { age: 100, ..valid_input() },
            EmployeeInput { attendance: 0.0, ..valid_input() },
            EmployeeInput { attendance: 100.0, ..valid_input() },
            EmployeeInput { salary: Some(0.0), ..valid_input() },
        ];
        for input in ok {
            assert!(input.into_new_employee().is_ok());
        }

        let bad = [
            EmployeeInput { name: "J".to_string(), ..valid_input() },
            EmployeeInput { name: "x".repeat(101), ..valid_input() },
            EmployeeInput { age: 17, ..valid_input() },
            EmployeeInput { age: 101, ..valid_input() },
            EmployeeInput { attendance: -0.5, ..valid_input() },
            EmployeeInput { attendance: 100.5, ..valid_input() },
            EmployeeInput { salary: Some(-1.0), ..valid_input() },
            EmployeeInput { class_name: " ".to_string(), ..valid_input() },
            EmployeeInput { subjects: vec![], ..valid_input() },
            EmployeeInput { subjects: vec!["  ".to_string()], ..valid_input() },
            EmployeeInput { email: "not-an-email".to_string(), ..valid_input() },
        ];
        for input in bad {
            let err = input.into_new_employee().unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR");
            assert!(err.to_string().starts_with("Validation error: "));
        }
    }

    #[test]
    fn test_error_message_uses_client_field_names() {
        let input = EmployeeInput {
            age: 10,
            class_name: String::new(),
            ..valid_input()
        };

        let err = input.into_new_employee().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation error: age: Age must be between 18 and 100, \
             class: Class must be between 1 and 50 characters"
        );
    }

    #[test]
    fn test_update_input_validates_only_present_fields() {
        let patch = EmployeeUpdateInput {
            age: Some(45),
            department: Some("  ".to_string()),
            position: Some(" Lead ".to_string()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();

        assert_eq!(patch.age, Some(45));
        assert_eq!(patch.name, None);
        assert_eq!(patch.department, Some(None));
        assert_eq!(patch.position, Some(Some("Lead".to_string())));

        let err = EmployeeUpdateInput {
            subjects: Some(vec![]),
            ..Default::default()
        }
        .into_patch()
        .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_filter_bounds() {
        assert!(EmployeeFiltersInput { min_age: Some(18), max_age: Some(100), ..Default::default() }
            .into_filter()
            .is_ok());
        assert!(EmployeeFiltersInput { min_age: Some(17), ..Default::default() }
            .into_filter()
            .is_err());
        assert!(EmployeeFiltersInput { max_age: Some(101), ..Default::default() }
            .into_filter()
            .is_err());
        assert!(EmployeeFiltersInput { max_attendance: Some(120.0), ..Default::default() }
            .into_filter()
            .is_err());
    }

    #[test]
    fn test_sort_input() {
        let sort = SortInput { field: "salary".to_string(), order: "ASC".to_string() }
            .into_sort()
            .unwrap();
        assert_eq!(sort.field.column(), "salary");

        let err = SortInput { field: "password_hash".to_string(), order: "ASC".to_string() }
            .into_sort()
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_register_args() {
        let args = RegisterArgs::new(
            " Alice ".to_string(),
            "Alice@Example.com".to_string(),
            "secret1".to_string(),
            None,
        );
        assert!(args.validate().is_ok());
        assert_eq!(args.username, "alice");
        assert_eq!(args.role(), Role::Employee);

        let args = RegisterArgs::new(
            "al".to_string(),
            "alice@example.com".to_string(),
            "12345".to_string(),
            Some("root".to_string()),
        );
        let err = AppError::from(args.validate().unwrap_err());
        let message = err.to_string();
        assert!(message.contains("password: Password must be between 6 and 100 characters"));
        assert!(message.contains("role: Role must be 'admin' or 'employee'"));
        assert!(message.contains("username: Username must be between 3 and 50 characters"));
    }

    #[test]
    fn test_login_args_require_both_fields() {
        let args = LoginArgs {
            username: String::new(),
            password: String::new(),
        };
        let err = AppError::from(args.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation error: password: Password is required, username: Username is required"
        );
    }
}
