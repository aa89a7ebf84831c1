//! Snackshop CLI - Operator tools for the backend.
//!
//! # Usage
//!
//! ```bash
//! # Check the backend is up
//! snackshop health
//!
//! # Validate a catalog seed file without sending anything
//! snackshop seed catalog.yaml --dry-run
//!
//! # Create the categories and products in a seed file
//! snackshop seed catalog.yaml
//!
//! # Manage users
//! snackshop users list
//! snackshop users set-role ann admin
//! ```
//!
//! # Commands
//!
//! - `health` - Backend health check
//! - `seed` - Seed the catalog from YAML
//! - `users` - List users and change roles

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use snackshop_core::UserRole;

mod commands;

#[derive(Parser)]
#[command(name = "snackshop")]
#[command(author, version, about = "Snackshop operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend answers its health check
    Health,
    /// Seed categories and products from a YAML file
    Seed {
        /// Path to the seed file
        file: String,

        /// Only parse and validate the file
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// List all users
    List,
    /// Change a user's role
    SetRole {
        /// User id or username
        user: String,

        /// New role (`customer` or `admin`)
        role: UserRole,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Health => commands::health::check().await,
        Commands::Seed { file, dry_run } => commands::seed::run(&file, dry_run).await,
        Commands::Users { action } => match action {
            UsersAction::List => commands::users::list().await,
            UsersAction::SetRole { user, role } => commands::users::set_role(&user, role).await,
        },
    }
}
