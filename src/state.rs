//! Shared application state handed to every handler.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;

use crate::api::graphql::{AppSchema, build_schema};
use crate::application::services::{
    AuthService, EmployeeService, SharedAuthService, SharedEmployeeService, SharedUserService,
    UserService,
};
use crate::config::{Config, Environment};
use crate::domain::repositories::{EmployeeRepository, UserRepository};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::{PgEmployeeRepository, PgUserRepository};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub schema: AppSchema,
    pub employee_service: SharedEmployeeService,
    pub user_service: SharedUserService,
    pub auth_service: SharedAuthService,
    pub cache: Arc<dyn CacheService>,
    pub environment: Environment,
    pub started_at: Instant,
}

impl AppState {
    /// Wires the PostgreSQL repositories, the services and the schema.
    pub fn new(db: Arc<PgPool>, cache: Arc<dyn CacheService>, config: &Config) -> Self {
        let employees: Arc<dyn EmployeeRepository> =
            Arc::new(PgEmployeeRepository::new(db.clone()));
        let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db.clone()));

        Self::with_repositories(db, employees, users, cache, config)
    }

    /// Same as [`new`](Self::new) with caller-supplied repositories.
    pub fn with_repositories(
        db: Arc<PgPool>,
        employees: Arc<dyn EmployeeRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheService>,
        config: &Config,
    ) -> Self {
        let auth_service: SharedAuthService = Arc::new(AuthService::new(
            users.clone(),
            cache.clone(),
            &config.jwt_secret,
            config.jwt_ttl(),
        ));
        let employee_service: SharedEmployeeService = Arc::new(EmployeeService::new(employees));
        let user_service: SharedUserService =
            Arc::new(UserService::new(users, auth_service.clone()));

        Self {
            db,
            schema: build_schema(employee_service.clone(), user_service.clone()),
            employee_service,
            user_service,
            auth_service,
            cache,
            environment: config.environment,
            started_at: Instant::now(),
        }
    }
}
