//! Employee entity and its create/update payloads.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A directory record for one employee.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    /// Exposed to clients as `class`.
    pub class_name: String,
    pub subjects: Vec<String>,
    pub attendance: f64,
    pub email: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub join_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new employee.
///
/// `join_date` is set by the store at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub age: i32,
    pub class_name: String,
    pub subjects: Vec<String>,
    pub attendance: f64,
    pub email: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
}

/// Partial update for an existing employee.
///
/// `None` fields are left unchanged. For the optional columns,
/// `Some(None)` clears the value and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub class_name: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub attendance: Option<f64>,
    pub email: Option<String>,
    pub department: Option<Option<String>>,
    pub position: Option<Option<String>>,
    pub salary: Option<Option<f64>>,
}

impl EmployeePatch {
    /// Returns true if the patch would not change any column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.class_name.is_none()
            && self.subjects.is_none()
            && self.attendance.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.position.is_none()
            && self.salary.is_none()
    }
}

/// Number of employees in one department; `None` groups unassigned employees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentCount {
    pub department: Option<String>,
    pub count: i64,
}
