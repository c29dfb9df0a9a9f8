//! PostgreSQL implementation of the employee repository.
//!
//! Listing queries are assembled with [`QueryBuilder`] so that every
//! client-supplied value is a bind parameter. Only whitelisted column names
//! from [`SortField::column`](crate::domain::query::SortField::column) are
//! spliced into the SQL text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{DepartmentCount, Employee, EmployeePatch, NewEmployee};
use crate::domain::query::{EmployeeFilter, EmployeeSort, PageRequest};
use crate::domain::repositories::EmployeeRepository;
use crate::error::AppError;
use crate::utils::sanitize::escape_like;

const EMPLOYEE_COLUMNS: &str = "id, name, age, class_name, subjects, attendance, email, \
     department, position, salary, join_date, created_at, updated_at";

#[derive(FromRow)]
struct EmployeeRow {
    id: Uuid,
    name: String,
    age: i32,
    class_name: String,
    subjects: Vec<String>,
    attendance: f64,
    email: String,
    department: Option<String>,
    position: Option<String>,
    salary: Option<f64>,
    join_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            name: row.name,
            age: row.age,
            class_name: row.class_name,
            subjects: row.subjects,
            attendance: row.attendance,
            email: row.email,
            department: row.department,
            position: row.position,
            salary: row.salary,
            join_date: row.join_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Appends the `WHERE` clause for `filter`. Text filters are expected to be
/// sanitized already; LIKE metacharacters are escaped here.
fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &EmployeeFilter) {
    builder.push(" WHERE TRUE");

    if let Some(name) = &filter.name {
        builder
            .push(" AND name ILIKE ")
            .push_bind(format!("%{}%", escape_like(name)))
            .push(" ESCAPE '\\'");
    }
    if let Some(class_name) = &filter.class_name {
        builder
            .push(" AND class_name = ")
            .push_bind(class_name.clone());
    }
    if let Some(department) = &filter.department {
        builder
            .push(" AND department ILIKE ")
            .push_bind(format!("%{}%", escape_like(department)))
            .push(" ESCAPE '\\'");
    }
    if let Some(min_age) = filter.min_age {
        builder.push(" AND age >= ").push_bind(min_age);
    }
    if let Some(max_age) = filter.max_age {
        builder.push(" AND age <= ").push_bind(max_age);
    }
    if let Some(min_attendance) = filter.min_attendance {
        builder.push(" AND attendance >= ").push_bind(min_attendance);
    }
    if let Some(max_attendance) = filter.max_attendance {
        builder.push(" AND attendance <= ").push_bind(max_attendance);
    }
}

/// Builds the paginated listing query. `id` breaks ties so that pages never
/// overlap when the sort column has duplicates.
fn build_list_query(
    filter: &EmployeeFilter,
    sort: EmployeeSort,
    page: PageRequest,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {EMPLOYEE_COLUMNS} FROM employees"));
    push_filter(&mut builder, filter);

    builder
        .push(" ORDER BY ")
        .push(sort.field.column())
        .push(" ")
        .push(sort.order.as_sql())
        .push(", id ASC");

    builder
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    builder
}

fn build_count_query(filter: &EmployeeFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM employees");
    push_filter(&mut builder, filter);
    builder
}

/// Builds the `UPDATE` for a non-empty patch.
fn build_update_query(id: Uuid, patch: EmployeePatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE employees SET ");

    {
        let mut set = builder.separated(", ");
        if let Some(name) = patch.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(age) = patch.age {
            set.push("age = ").push_bind_unseparated(age);
        }
        if let Some(class_name) = patch.class_name {
            set.push("class_name = ").push_bind_unseparated(class_name);
        }
        if let Some(subjects) = patch.subjects {
            set.push("subjects = ").push_bind_unseparated(subjects);
        }
        if let Some(attendance) = patch.attendance {
            set.push("attendance = ").push_bind_unseparated(attendance);
        }
        if let Some(email) = patch.email {
            set.push("email = ").push_bind_unseparated(email);
        }
        if let Some(department) = patch.department {
            set.push("department = ").push_bind_unseparated(department);
        }
        if let Some(position) = patch.position {
            set.push("position = ").push_bind_unseparated(position);
        }
        if let Some(salary) = patch.salary {
            set.push("salary = ").push_bind_unseparated(salary);
        }
        set.push("updated_at = NOW()");
    }

    builder
        .push(" WHERE id = ")
        .push_bind(id)
        .push(format!(" RETURNING {EMPLOYEE_COLUMNS}"));

    builder
}

/// PostgreSQL repository for employee records.
pub struct PgEmployeeRepository {
    pool: Arc<PgPool>,
}

impl PgEmployeeRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn create(&self, new_employee: NewEmployee) -> Result<Employee, AppError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            r#"
            INSERT INTO employees
                (name, age, class_name, subjects, attendance, email, department, position, salary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(new_employee.name)
        .bind(new_employee.age)
        .bind(new_employee.class_name)
        .bind(new_employee.subjects)
        .bind(new_employee.attendance)
        .bind(new_employee.email)
        .bind(new_employee.department)
        .bind(new_employee.position)
        .bind(new_employee.salary)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Employee::from))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Employee>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Employee::from))
    }

    async fn list(
        &self,
        filter: &EmployeeFilter,
        sort: EmployeeSort,
        page: PageRequest,
    ) -> Result<Vec<Employee>, AppError> {
        let mut builder = build_list_query(filter, sort, page);

        let rows = builder
            .build_query_as::<EmployeeRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn count(&self, filter: &EmployeeFilter) -> Result<i64, AppError> {
        let mut builder = build_count_query(filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Option<Employee>, AppError> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut builder = build_update_query(id, patch);

        let row = builder
            .build_query_as::<EmployeeRow>()
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Employee::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM employees")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_by_department(&self) -> Result<Vec<DepartmentCount>, AppError> {
        let rows = sqlx::query_as::<_, (Option<String>, i64)>(
            r#"
            SELECT department, COUNT(*) AS count
            FROM employees
            GROUP BY department
            ORDER BY count DESC, department ASC NULLS LAST
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(department, count)| DepartmentCount { department, count })
            .collect())
    }
}
