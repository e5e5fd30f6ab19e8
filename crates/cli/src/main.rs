//! Dimakatso CLI - Catalog seeding and role management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the starter catalog
//! dk-cli seed
//!
//! # Grant the admin role to an account
//! dk-cli admin grant -e thandi@example.com
//!
//! # Revoke the admin role
//! dk-cli admin revoke -e thandi@example.com
//! ```
//!
//! # Commands
//!
//! - `seed` - Insert the starter catalog into the `products` relation
//! - `admin grant` / `admin revoke` - Manage the `admin` role on profiles
//!
//! Requires `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY` in the
//! environment (or a `.env` file).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dk-cli")]
#[command(author, version, about = "Dimakatso Salts CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the starter catalog
    Seed,
    /// Manage admin roles
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin role to an account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke the admin role from an account
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => commands::admin::grant(&email).await?,
            AdminAction::Revoke { email } => commands::admin::revoke(&email).await?,
        },
    }
    Ok(())
}
