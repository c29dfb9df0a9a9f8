use async_graphql::{Context, ID, Object, Result, ResultExt};
use validator::Validate;

use super::context::{parse_employee_id, require_role};
use super::inputs::{EmployeeInput, EmployeeUpdateInput, LoginArgs, RegisterArgs};
use super::types::{AuthPayload, EmployeeObject};
use crate::application::services::{Registration, SharedEmployeeService, SharedUserService};
use crate::domain::entities::Role;
use crate::error::AppError;

const EMPLOYEE_WRITERS: &[Role] = &[Role::Admin];

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates an account and signs it in.
    async fn register(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
        role: Option<String>,
    ) -> Result<AuthPayload> {
        let args = RegisterArgs::new(username, email, password, role);
        args.validate().map_err(AppError::from).extend()?;

        let registration = Registration {
            role: args.role(),
            username: args.username,
            email: args.email,
            password: args.password,
        };

        let service = ctx.data::<SharedUserService>()?;
        let session = service.register(registration).await.extend()?;
        Ok(session.into())
    }

    /// Signs in with a username or an email address.
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<AuthPayload> {
        let args = LoginArgs { username, password };
        args.validate().map_err(AppError::from).extend()?;

        let service = ctx.data::<SharedUserService>()?;
        let session = service.login(&args.username, &args.password).await.extend()?;
        Ok(session.into())
    }

    async fn add_employee(&self, ctx: &Context<'_>, input: EmployeeInput) -> Result<EmployeeObject> {
        require_role(ctx, EMPLOYEE_WRITERS).extend()?;
        let new_employee = input.into_new_employee().extend()?;

        let service = ctx.data::<SharedEmployeeService>()?;
        let employee = service.create(new_employee).await.extend()?;
        Ok(EmployeeObject(employee))
    }

    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: EmployeeUpdateInput,
    ) -> Result<EmployeeObject> {
        require_role(ctx, EMPLOYEE_WRITERS).extend()?;
        let employee_id = parse_employee_id(&id).extend()?;
        let patch = input.into_patch().extend()?;

        let service = ctx.data::<SharedEmployeeService>()?;
        let employee = service.update(employee_id, patch).await.extend()?;
        Ok(EmployeeObject(employee))
    }

    async fn delete_employee(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        require_role(ctx, EMPLOYEE_WRITERS).extend()?;
        let employee_id = parse_employee_id(&id).extend()?;

        let service = ctx.data::<SharedEmployeeService>()?;
        service.delete(employee_id).await.extend()
    }
}
