use async_graphql::{Context, ID, Object, Result, ResultExt, dataloader::DataLoader};
use serde_json::json;

use super::context::{parse_employee_id, require_auth};
use super::inputs::{EmployeeFiltersInput, SortInput};
use super::loader::EmployeeLoader;
use super::types::{EmployeeObject, EmployeesResponse, UserObject};
use crate::application::services::{SharedEmployeeService, SharedUserService};
use crate::domain::query::{EmployeeFilter, EmployeeSort, PageRequest};
use crate::error::AppError;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Paginated, filtered and sorted employee listing. Open to everyone.
    async fn employees(
        &self,
        ctx: &Context<'_>,
        filters: Option<EmployeeFiltersInput>,
        page: Option<i32>,
        page_size: Option<i32>,
        sort: Option<SortInput>,
    ) -> Result<EmployeesResponse> {
        let service = ctx.data::<SharedEmployeeService>()?;

        let filter = match filters {
            Some(filters) => filters.into_filter().extend()?,
            None => EmployeeFilter::default(),
        };
        let sort = match sort {
            Some(sort) => sort.into_sort().extend()?,
            None => EmployeeSort::default(),
        };
        let page = PageRequest::new(page.map(i64::from), page_size.map(i64::from));

        let result = service.list(filter, sort, page).await.extend()?;
        Ok(result.into())
    }

    /// A single employee, batched through the request's loader.
    async fn employee(&self, ctx: &Context<'_>, id: ID) -> Result<Option<EmployeeObject>> {
        let employee_id = parse_employee_id(&id).extend()?;
        let loader = ctx.data::<DataLoader<EmployeeLoader>>()?;

        let employee = loader
            .load_one(employee_id)
            .await
            .extend()?
            .ok_or_else(|| {
                AppError::not_found("Employee not found", json!({ "id": employee_id.to_string() }))
            })
            .extend()?;

        Ok(Some(EmployeeObject(employee)))
    }

    /// The signed-in user, re-read from the store.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let user = require_auth(ctx).extend()?;
        let service = ctx.data::<SharedUserService>()?;

        let current = service.current_user(user.id).await.extend()?;
        Ok(Some(UserObject(current)))
    }
}
