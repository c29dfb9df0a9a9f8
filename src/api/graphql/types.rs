//! GraphQL output types.
//!
//! Domain values are wrapped rather than annotated so that the domain layer
//! stays free of GraphQL concerns.

use async_graphql::{ID, Object, SimpleObject};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::application::services::AuthSession;
use crate::domain::entities::{AuthenticatedUser, Employee};
use crate::domain::query::{EmployeePage, PaginationInfo};

/// Renders a timestamp as RFC 3339 with milliseconds and a `Z` suffix.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct EmployeeObject(pub Employee);

#[Object(name = "Employee")]
impl EmployeeObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn age(&self) -> i32 {
        self.0.age
    }

    async fn class(&self) -> &str {
        &self.0.class_name
    }

    async fn subjects(&self) -> &Vec<String> {
        &self.0.subjects
    }

    async fn attendance(&self) -> f64 {
        self.0.attendance
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn department(&self) -> Option<&str> {
        self.0.department.as_deref()
    }

    async fn position(&self) -> Option<&str> {
        self.0.position.as_deref()
    }

    async fn salary(&self) -> Option<f64> {
        self.0.salary
    }

    async fn join_date(&self) -> String {
        format_timestamp(&self.0.join_date)
    }

    async fn created_at(&self) -> String {
        format_timestamp(&self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        format_timestamp(&self.0.updated_at)
    }
}

pub struct UserObject(pub AuthenticatedUser);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn username(&self) -> &str {
        &self.0.username
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn role(&self) -> &str {
        self.0.role.as_str()
    }
}

#[derive(SimpleObject)]
#[graphql(name = "AuthPayload")]
pub struct AuthPayload {
    pub token: String,
    pub user: UserObject,
}

impl From<AuthSession> for AuthPayload {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: UserObject(session.user),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "PaginationInfo")]
pub struct PaginationInfoObject {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl From<PaginationInfo> for PaginationInfoObject {
    fn from(info: PaginationInfo) -> Self {
        Self {
            total: info.total,
            page: info.page,
            page_size: info.page_size,
            total_pages: info.total_pages,
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
        }
    }
}

#[derive(SimpleObject)]
pub struct EmployeesResponse {
    pub employees: Vec<EmployeeObject>,
    pub pagination: PaginationInfoObject,
}

impl From<EmployeePage> for EmployeesResponse {
    fn from(page: EmployeePage) -> Self {
        Self {
            employees: page.employees.into_iter().map(EmployeeObject).collect(),
            pagination: page.pagination.into(),
        }
    }
}
