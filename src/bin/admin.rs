//! CLI administration tool for linkcut.
//!
//! Provides commands for managing accounts and performing database
//! operations without requiring HTTP API access. Role changes are only
//! possible here; the HTTP surface never touches roles.
//!
//! # Usage
//!
//! ```bash
//! # Create the first admin account
//! cargo run --bin admin -- user create-admin
//!
//! # List all accounts
//! cargo run --bin admin -- user list
//!
//! # Promote an account to the admin role
//! cargo run --bin admin -- user promote alice
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//!
//! # Features
//!
//! - **Account Management**: Create admins, list accounts, promote users
//! - **Database Tools**: Connection checks
//! - **Interactive Prompts**: Hidden password input with confirmation
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use linkcut::domain::access::Role;
use linkcut::domain::entities::{NewUser, UserPatch};
use linkcut::domain::repositories::UserRepository;
use linkcut::infrastructure::persistence::PgUserRepository;
use linkcut::utils::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkcut.
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
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create an account with the admin role
    CreateAdmin {
        /// Username (prompted interactively when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all accounts
    List,

    /// Promote an existing account to the admin role
    Promote {
        /// Username to promote
        username: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches account management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::CreateAdmin { username, yes } => {
            create_admin(repo, username, yes).await?;
        }
        UserAction::List => {
            list_users(repo).await?;
        }
        UserAction::Promote { username } => {
            promote_user(repo, username).await?;
        }
    }

    Ok(())
}

/// Creates an admin account with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for username (or use provided)
/// 2. Prompt for password twice (hidden input)
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Hash the password with Argon2id
/// 5. Store the account with the admin role
async fn create_admin(
    repo: Arc<PgUserRepository>,
    username: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👑 Create Admin Account".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create admin account '{}'?", username))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = hash_password(&password).context("Failed to hash password")?;

    let user = repo
        .create(NewUser {
            username,
            password_hash,
            role: Role::Admin,
        })
        .await
        .context("Failed to create account")?;

    println!();
    println!("{}", "✅ Admin account created!".green().bold());
    println!();
    println!("  ID:       {}", user.id.to_string().bright_black());
    println!("  Username: {}", user.username.cyan());
    println!();
    println!("{}", "Sign in to get a bearer token:".bright_white());
    println!(
        "  curl -X POST http://localhost:3000/user/signin \\
    -H 'Content-Type: application/json' \\
    -d '{{\"username\": \"{}\", \"password\": \"...\"}}'",
        user.username
    );
    println!();

    Ok(())
}

/// Lists all accounts with their roles.
///
/// # Output Format
///
/// ```text
/// 📋 Accounts
///
///   ID                                   Username             Role    Created
///   ──────────────────────────────────────────────────────────────────────────────
///   6d9c7f4e-...                         alice                admin   2026-01-15 10:30
/// ```
async fn list_users(repo: Arc<PgUserRepository>) -> Result<()> {
    println!("{}", "📋 Accounts".bright_blue().bold());
    println!();

    let users = repo.list().await.context("Failed to list accounts")?;

    if users.is_empty() {
        println!("{}", "  No accounts found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create-admin",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<36} {:<20} {:<7} {:<16}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Role".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(82).bright_black());

    for user in &users {
        let role = match user.role {
            Role::Admin => user.role.as_str().bright_yellow(),
            Role::User => user.role.as_str().normal(),
        };

        println!(
            "  {:<36} {:<20} {:<7} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
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

/// Promotes an account to the admin role with a confirmation prompt.
async fn promote_user(repo: Arc<PgUserRepository>, username: String) -> Result<()> {
    println!("{}", "⬆️  Promote Account".bright_blue().bold());
    println!();

    let user = repo
        .find_by_username(&username)
        .await
        .context("Failed to look up account")?
        .context("Account not found")?;

    if user.role == Role::Admin {
        println!("{}", "⚠️  This account is already an admin".yellow());
        return Ok(());
    }

    println!("  Username: {}", user.username.cyan());
    println!("  ID:       {}", user.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Promote this account to admin?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.update(
        user.id,
        UserPatch {
            username: None,
            password_hash: None,
            role: Some(Role::Admin),
        },
    )
    .await
    .context("Failed to promote account")?;

    println!();
    println!("{}", "✅ Account promoted to admin!".green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
