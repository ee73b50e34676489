//! # bakefs Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file is the entry point of the `bakefs` binary, a thin command-line
//! harness over the library. It handles:
//! - Command-line argument parsing using Clap
//! - Loading configuration (`.bakefs.toml`, user `config.toml`)
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! bakefs --help
//!
//! # Show every corrective action (created parents, replaced entries)
//! bakefs -v cp templates/app out/app
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Load and validate configuration
//! 3. Configure logging (`-v` flags win over the configured level; `RUST_LOG` wins over both)
//! 4. Route to the command handler
//! 5. Print any error and exit with status 1
//!
use bakefs::core::config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

use commands::{inspect, mutate};

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "bakefs",
    about = "Self-healing filesystem operations for bake projects",
    long_about = "Idempotent mkdir/rm/ln, permission-preserving cp, and filtered directory listing.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create directories, including missing parents
    Mkdir(mutate::MkdirArgs),
    /// Copy a file or directory tree
    Cp(mutate::CpArgs),
    /// Remove files, links or directory trees
    Rm(mutate::RmArgs),
    /// Rename an entry
    Mv(mutate::MvArgs),
    /// Create or update a symbolic link
    Ln(mutate::LnArgs),
    /// Create empty files if missing
    Touch(mutate::TouchArgs),
    /// List a directory, optionally filtered
    Ls(inspect::LsArgs),
    /// Show type, mode and modification time of an entry
    Stat(inspect::StatArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let log_level = match cli.verbose {
        0 => cfg.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Mkdir(args) => mutate::handle_mkdir(args, &cfg),
        Commands::Cp(args) => mutate::handle_cp(args, &cfg),
        Commands::Rm(args) => mutate::handle_rm(args, &cfg),
        Commands::Mv(args) => mutate::handle_mv(args, &cfg),
        Commands::Ln(args) => mutate::handle_ln(args, &cfg),
        Commands::Touch(args) => mutate::handle_touch(args, &cfg),
        Commands::Ls(args) => inspect::handle_ls(args, &cfg),
        Commands::Stat(args) => inspect::handle_stat(args, &cfg),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
