//! Per-request batching of employee lookups.
//!
//! Every `employee(id)` field resolved within one request is collected by a
//! [`DataLoader`](async_graphql::dataloader::DataLoader) and fetched with a
//! single `WHERE id = ANY($1)` query.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use uuid::Uuid;

use crate::application::services::SharedEmployeeService;
use crate::domain::entities::Employee;
use crate::error::AppError;

pub struct EmployeeLoader {
    service: SharedEmployeeService,
}

impl EmployeeLoader {
    pub fn new(service: SharedEmployeeService) -> Self {
        Self { service }
    }
}

impl Loader<Uuid> for EmployeeLoader {
    type Value = Employee;
    type Error = AppError;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(batch = keys.len(), "Loading employees");

        let employees = self.service.get_many(keys).await?;
        Ok(employees.into_iter().map(|e| (e.id, e)).collect())
    }
}
