//! Query model for listing employees: filters, sorting and pagination.
//!
//! These types carry already-validated values from the API layer down to the
//! repository, which turns them into SQL.
//!
//! # Pagination
//!
//! ```ignore
//! let page = PageRequest::new(Some(3), Some(20));
//! assert_eq!(page.offset(), 40);
//! assert_eq!(PaginationInfo::new(&page, 45).total_pages, 3);
//! ```

use std::{fmt, str::FromStr};

use crate::domain::entities::Employee;
use crate::utils::sanitize::non_empty_sanitized;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    /// Normalizes raw client values.
    ///
    /// A missing or zero `page` becomes 1 and negative pages are raised to 1.
    /// A missing or zero `page_size` becomes 10, then the size is clamped to
    /// `1..=100`.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            None | Some(0) => DEFAULT_PAGE,
            Some(p) => p.max(1),
        };
        let page_size = match page_size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(s) => s,
        }
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        Self { page, page_size }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata returned with every employee listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationInfo {
    pub fn new(request: &PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = (total + request.page_size - 1) / request.page_size;

        Self {
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages,
            has_next_page: request.page < total_pages,
            has_previous_page: request.page > 1,
        }
    }
}

/// One page of employees plus its pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeePage {
    pub employees: Vec<Employee>,
    pub pagination: PaginationInfo,
}

/// Listing filters. All conditions are combined with `AND`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Exact class.
    pub class_name: Option<String>,
    /// Case-insensitive substring of the department.
    pub department: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_attendance: Option<f64>,
    pub max_attendance: Option<f64>,
}

impl EmployeeFilter {
    /// Strips markup from the text filters and drops the ones left empty.
    pub fn sanitized(self) -> Self {
        Self {
            name: non_empty_sanitized(self.name.as_deref()),
            class_name: non_empty_sanitized(self.class_name.as_deref()),
            department: non_empty_sanitized(self.department.as_deref()),
            ..self
        }
    }

    /// Returns true when no condition applies.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Columns an employee listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Name,
    Age,
    Class,
    Attendance,
    Email,
    Department,
    Position,
    Salary,
    JoinDate,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 11] = [
        SortField::Name,
        SortField::Age,
        SortField::Class,
        SortField::Attendance,
        SortField::Email,
        SortField::Department,
        SortField::Position,
        SortField::Salary,
        SortField::JoinDate,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    /// Field name as clients spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Age => "age",
            SortField::Class => "class",
            SortField::Attendance => "attendance",
            SortField::Email => "email",
            SortField::Department => "department",
            SortField::Position => "position",
            SortField::Salary => "salary",
            SortField::JoinDate => "joinDate",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Database column backing the field.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Age => "age",
            SortField::Class => "class_name",
            SortField::Attendance => "attendance",
            SortField::Email => "email",
            SortField::Department => "department",
            SortField::Position => "position",
            SortField::Salary => "salary",
            SortField::JoinDate => "join_date",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortParseError {
    #[error("Invalid sort field '{0}'")]
    Field(String),
    #[error("Sort order must be 'ASC' or 'DESC', got '{0}'")]
    Order(String),
}

impl FromStr for SortField {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| SortParseError::Field(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(SortParseError::Order(other.to_string())),
        }
    }
}

/// Ordering of an employee listing. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmployeeSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl EmployeeSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Parses a client-supplied `{ field, order }` pair.
    pub fn parse(field: &str, order: &str) -> Result<Self, SortParseError> {
        Ok(Self {
            field: field.parse()?,
            order: order.parse()?,
        })
    }
}
