#![allow(dead_code)]

use employee_directory::application::services::Registration;
use employee_directory::config::{Config, Environment};
use employee_directory::domain::entities::{Employee, NewEmployee, Role, User};
use employee_directory::domain::repositories::EmployeeRepository;
use employee_directory::infrastructure::cache::MemoryCache;
use employee_directory::infrastructure::persistence::PgEmployeeRepository;
use employee_directory::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

pub const ADMIN_PASSWORD: &str = "admin123";
pub const EMPLOYEE_PASSWORD: &str = "emp123";

pub fn test_config() -> Config {
    Config {
        environment: Environment::Test,
        database_url: "postgres://localhost/test".to_string(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        jwt_secret: "test-signing-secret".to_string(),
        jwt_expires_in: "1h".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        user_cache_ttl_seconds: 300,
        user_cache_capacity: 100,
        db_max_connections: 5,
        db_connect_timeout: 5,
        db_idle_timeout: 600,
        db_max_lifetime: 1800,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    let cache = Arc::new(MemoryCache::new(Duration::from_secs(300), 100));
    AppState::new(Arc::new(pool), cache, &test_config())
}

pub fn new_employee(name: &str, email: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        age: 30,
        class_name: "Engineering".to_string(),
        subjects: vec!["Mathematics".to_string(), "Physics".to_string()],
        attendance: 90.0,
        email: email.to_string(),
        department: Some("IT".to_string()),
        position: Some("Developer".to_string()),
        salary: Some(80000.0),
    }
}

pub async fn create_test_employee(pool: &PgPool, employee: NewEmployee) -> Employee {
    PgEmployeeRepository::new(Arc::new(pool.clone()))
        .create(employee)
        .await
        .unwrap()
}

pub async fn create_test_user(state: &AppState, username: &str, password: &str, role: Role) -> User {
    state
        .user_service
        .create_user(Registration {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: password.to_string(),
            role,
        })
        .await
        .unwrap()
}
