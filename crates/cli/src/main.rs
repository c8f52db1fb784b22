//! Hactor CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending database migrations
//! hactor-cli migrate
//!
//! # Provision an admin (password is read from stdin)
//! echo 'correct horse battery staple' | hactor-cli admin create -u root
//!
//! # Deactivate an admin and revoke its sessions
//! hactor-cli admin deactivate -u root
//!
//! # Seed the activity field catalogue and migrate legacy codes
//! hactor-cli fields sync
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hactor-cli")]
#[command(author, version, about = "Hactor site operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage the activity field catalogue
    Fields {
        #[command(subcommand)]
        action: FieldsAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin; the password is read from stdin
    Create {
        /// Login username
        #[arg(short, long)]
        username: String,
    },
    /// Deactivate an admin and revoke all of its sessions
    Deactivate {
        /// Login username
        #[arg(short, long)]
        username: String,
    },
}

#[derive(Subcommand)]
enum FieldsAction {
    /// Insert missing default fields and merge the legacy `pawnable` code
    Sync,
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { username } => {
                commands::admin::create(&username).await?;
            }
            AdminAction::Deactivate { username } => {
                commands::admin::deactivate(&username).await?;
            }
        },
        Commands::Fields { action } => match action {
            FieldsAction::Sync => commands::fields::sync().await?,
        },
    }
    Ok(())
}
