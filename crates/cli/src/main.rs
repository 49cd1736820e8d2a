//! Hondana CLI - Seeding and diagnostics tools.
//!
//! # Usage
//!
//! ```bash
//! # Validate a seed file without writing anything
//! hondana-cli seed --file seed.yaml --dry-run
//!
//! # Seed the hosted database (skips rows whose name already exists)
//! hondana-cli seed --file seed.yaml
//!
//! # Check configuration and connectivity
//! hondana-cli check
//! ```
//!
//! # Commands
//!
//! - `seed` - Load areas/categories/category-tags/stores from a YAML file
//! - `check` - Verify configuration and report per-table row counts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hondana-cli")]
#[command(author, version, about = "Hondana CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the hosted database from a YAML file
    Seed {
        /// Path to the YAML seed file
        #[arg(short, long)]
        file: String,

        /// Parse and validate the file without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Check configuration and hosted database connectivity
    Check,
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
        Commands::Seed { file, dry_run } => commands::seed::run(&file, dry_run).await?,
        Commands::Check => commands::check::run().await?,
    }
    Ok(())
}
