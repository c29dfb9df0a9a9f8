//! CLI administration tool for the employee directory.
//!
//! Seeds demo data, manages user accounts, shows statistics and performs
//! database operations without going through the GraphQL API.
//!
//! # Usage
//!
//! ```bash
//! # Reset the database to the demo data set
//! cargo run --bin admin -- seed
//!
//! # Create a user (prompts for missing values)
//! cargo run --bin admin -- user create --username alice --role admin
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`)

use employee_directory::api::graphql::inputs::RegisterArgs;
use employee_directory::application::services::{AuthService, EmployeeService, Registration, UserService};
use employee_directory::config::{Config, mask_connection_string};
use employee_directory::domain::repositories::{EmployeeRepository, UserRepository};
use employee_directory::infrastructure::cache::NullCache;
use employee_directory::infrastructure::persistence::{PgEmployeeRepository, PgUserRepository};
use employee_directory::seed::{self, DEFAULT_USERS};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password, Select};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// CLI tool for managing the employee directory.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Wipe users and employees and load the demo data set
    Seed {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// `admin` or `employee`
        #[arg(short, long)]
        role: Option<String>,

        /// Password (random when omitted and --yes is given)
        #[arg(short, long)]
        password: Option<String>,

        /// Skip prompts and confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

struct Services {
    employees: EmployeeService<dyn EmployeeRepository>,
    users: UserService<dyn UserRepository>,
}

impl Services {
    fn new(pool: &PgPool) -> Self {
        let pool = Arc::new(pool.clone());
        let employee_repo: Arc<dyn EmployeeRepository> =
            Arc::new(PgEmployeeRepository::new(pool.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));

        // No tokens are issued from the CLI, so the signing secret is optional.
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        let auth = Arc::new(AuthService::new(
            user_repo.clone(),
            Arc::new(NullCache::new()),
            &secret,
            Duration::from_secs(60),
        ));

        Self {
            employees: EmployeeService::new(employee_repo),
            users: UserService::new(user_repo, auth),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Seed { yes } => seed_database(&pool, yes).await?,
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Replaces all users and employees with the demo data set.
async fn seed_database(pool: &PgPool, skip_confirm: bool) -> Result<()> {
    println!("{}", "🌱 Seed Database".bright_blue().bold());
    println!();
    println!(
        "{}",
        "⚠️  This deletes ALL users and employees.".red().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Continue?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let services = Services::new(pool);
    let summary = seed::seed(&services.employees, &services.users)
        .await
        .map_err(|e| anyhow::anyhow!("Seeding failed: {}", e))?;

    println!("{}", "✅ Database seeded successfully!".green().bold());
    println!(
        "  Users:     {}",
        summary.users.to_string().bright_green().bold()
    );
    println!(
        "  Employees: {}",
        summary.employees.to_string().bright_green().bold()
    );
    println!();
    println!("{}", "Default credentials:".bright_white());
    for user in &DEFAULT_USERS {
        println!(
            "  {:<9} username: {}  password: {}",
            user.role.as_str().cyan(),
            user.username.bright_white(),
            user.password.bright_yellow()
        );
    }
    println!();

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let services = Services::new(pool);

    match action {
        UserAction::Create {
            username,
            email,
            role,
            password,
            yes,
        } => create_user(&services.users, username, email, role, password, yes).await?,
        UserAction::List => list_users(&services.users).await?,
    }

    Ok(())
}

/// Creates a user with interactive prompts for missing values.
///
/// With `--yes`, missing values are not prompted for: the role defaults to
/// `employee` and the password is generated and printed once.
async fn create_user(
    users: &UserService<dyn UserRepository>,
    username: Option<String>,
    email: Option<String>,
    role: Option<String>,
    password: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None if skip_confirm => anyhow::bail!("--username is required with --yes"),
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None if skip_confirm => anyhow::bail!("--email is required with --yes"),
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let role = match role {
        Some(r) => r,
        None if skip_confirm => "employee".to_string(),
        None => {
            let roles = ["employee", "admin"];
            let index = Select::new()
                .with_prompt("Role")
                .items(&roles)
                .default(0)
                .interact()?;
            roles[index].to_string()
        }
    };

    let (password, generated) = match password {
        Some(p) => (p, false),
        None if skip_confirm => (generate_password(), true),
        None => {
            let entered: String = Password::new()
                .with_prompt("Password (leave empty to generate)")
                .allow_empty_password(true)
                .interact()?;
            if entered.is_empty() {
                (generate_password(), true)
            } else {
                (entered, false)
            }
        }
    };

    let args = RegisterArgs::new(username, email, password, Some(role));
    if let Err(errors) = args.validate() {
        let err = employee_directory::AppError::from(errors);
        anyhow::bail!("{}", err);
    }

    println!();
    println!("{}", "User details:".bright_white().bold());
    println!("  Username: {}", args.username.cyan());
    println!("  Email:    {}", args.email.cyan());
    println!("  Role:     {}", args.role().as_str().cyan());
    if generated {
        println!("  Password: {}", args.password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "⚠️  IMPORTANT: Save this password now! It is not stored in plain text."
                .red()
                .bold()
        );
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let registration = Registration {
        role: args.role(),
        username: args.username,
        email: args.email,
        password: args.password,
    };

    let user = users
        .create_user(registration)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!(
        "{} {}",
        "✅ User created:".green().bold(),
        user.id.to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Lists all users.
///
/// # Output Format
///
/// ```text
/// 📋 Users
///
///   Username             Email                          Role       Created
///   ──────────────────────────────────────────────────────────────────────────
///   admin                admin@ultraship.com            admin      2025-01-15 10:30
/// ```
async fn list_users(users: &UserService<dyn UserRepository>) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<20} {:<30} {:<10} {}",
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(78).bright_black());

    for user in &users {
        let role = if user.role.as_str() == "admin" {
            user.role.as_str().magenta()
        } else {
            user.role.as_str().green()
        };

        println!(
            "  {:<20} {:<30} {:<10} {}",
            user.username.cyan(),
            user.email,
            role,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Displays employee and user counts and the per-department breakdown.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let services = Services::new(pool);

    let employees = services
        .employees
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let users = services
        .users
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let departments = services
        .employees
        .department_breakdown()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Employees: {}",
        employees.to_string().bright_green().bold()
    );
    println!("  Users:     {}", users.to_string().bright_green().bold());

    if !departments.is_empty() {
        println!();
        println!("{}", "  By department:".bright_white());
        for entry in &departments {
            let name = entry.department.as_deref().unwrap_or("(none)");
            println!(
                "    {:<25} {}",
                name.cyan(),
                entry.count.to_string().bright_white()
            );
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "🛠️  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Generates a random 16-character alphanumeric password.
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";
    const PASSWORD_LEN: usize = 16;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
