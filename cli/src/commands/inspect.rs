//! # bakefs Inspection Commands
//!
//! File: cli/src/commands/inspect.rs
//!
//! ## Overview
//!
//! Handlers for `bakefs ls` and `bakefs stat`.
//!
//! `ls` prints one entry per line. Without a filter, or with a flat filter
//! such as `*.c`, it prints bare names; with a recursive filter such as
//! `//*.o` it prints the full path of every match in the subtree.
//!
//! ```bash
//! bakefs ls src
//! bakefs ls src --filter '*.c|*.h'
//! bakefs ls build --filter '//*.o'
//! bakefs stat bin/tool
//! ```
//!
use anyhow::{Context, Result};
use bakefs::core::config::Config;
use bakefs::ErrorKind;
use chrono::{DateTime, Local};
use clap::Parser;

/// Arguments for `bakefs ls`.
#[derive(Parser, Debug)]
pub struct LsArgs {
    /// Directory to list.
    #[arg(default_value = ".")]
    dir: String,
    /// Filter pattern; `**` or a leading `//` makes it recursive.
    #[arg(short, long)]
    filter: Option<String>,
}

/// Arguments for `bakefs stat`.
#[derive(Parser, Debug)]
pub struct StatArgs {
    path: String,
}

pub fn handle_ls(args: LsArgs, _cfg: &Config) -> Result<()> {
    let mut entries = bakefs::open_dir_iter(Some(&args.dir), args.filter.as_deref())?;
    while entries.has_next() {
        if let Some(entry) = entries.next_entry() {
            println!("{}", entry);
        }
    }
    entries.release();
    Ok(())
}

pub fn handle_stat(args: StatArgs, _cfg: &Config) -> Result<()> {
    let path = args.path.as_str();
    if !bakefs::exists(path) {
        anyhow::bail!("stat '{}': no such file or directory", path);
    }

    let kind = if bakefs::is_symlink(path) {
        "symlink"
    } else if bakefs::is_directory(path) {
        "directory"
    } else {
        "file"
    };
    println!("{}: {}", path, kind);

    let mode = match bakefs::get_permissions(path) {
        Ok(mode) => mode,
        // A dangling link has no target to report mode or mtime for.
        Err(e) if e.kind() == ErrorKind::NotFound => {
            println!("  target: missing");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let modified: DateTime<Local> = bakefs::last_modified(path)
        .with_context(|| format!("Failed to read modification time of {}", path))?
        .into();
    println!("  mode: {:04o}", mode);
    println!("  modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}
