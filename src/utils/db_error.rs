//! Translation of database constraint violations into client-facing messages.

/// Unique constraint on `employees.email`.
pub const EMPLOYEES_EMAIL_KEY: &str = "employees_email_key";
/// Unique constraint on `users.username`.
pub const USERS_USERNAME_KEY: &str = "users_username_key";
/// Unique constraint on `users.email`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// Returns the conflict message for a violated unique constraint.
pub fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(EMPLOYEES_EMAIL_KEY) => "Employee with this email already exists",
        Some(USERS_USERNAME_KEY) | Some(USERS_EMAIL_KEY) => {
            "User already exists with this email or username"
        }
        _ => "Unique constraint violation",
    }
}
