//! edgekv CLI
//!
//! Deploys a site's redirect and header rules to edgekv stores.
//!
//! # Commands
//!
//! - `deploy` - Build, validate, and reconcile site rules into the stores
//! - `validate` - Build the rules and check them against the store budgets
//! - `version` - Show version information

mod commands;
mod config;
mod desired;

use clap::{Parser, Subcommand};
use config::{ConfigFile, Settings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// edgekv site-rules deployment tool.
#[derive(Parser)]
#[command(name = "edgekv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, validate, and reconcile site rules into the stores
    Deploy {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Site root to derive desired state from
        #[arg(short, long)]
        site: Option<PathBuf>,

        /// Directory of the redirects store
        #[arg(long)]
        redirects_store: Option<PathBuf>,

        /// Directory of the headers store
        #[arg(long)]
        headers_store: Option<PathBuf>,

        /// Build and validate only, print the desired entries
        #[arg(short, long)]
        dry_run: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Build the rules and check them against the store budgets
    Validate {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Site root to derive desired state from
        #[arg(short, long)]
        site: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Deploy {
            config,
            site,
            redirects_store,
            headers_store,
            dry_run,
            format,
        } => {
            let file = ConfigFile::load(config.as_deref())?;
            let settings = Settings::resolve(file, site, redirects_store, headers_store)?;
            commands::deploy::run(&settings, dry_run, &format)?;
        }
        Commands::Validate {
            config,
            site,
            format,
        } => {
            let file = ConfigFile::load(config.as_deref())?;
            let settings = Settings::resolve(file, site, None, None)?;
            commands::validate::run(&settings, &format)?;
        }
        Commands::Version => {
            println!("edgekv v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
