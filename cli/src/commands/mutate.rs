//! # bakefs Mutating Commands
//!
//! File: cli/src/commands/mutate.rs
//!
//! ## Overview
//!
//! Handlers for `bakefs mkdir | cp | rm | mv | ln | touch`.
//!
//! ```bash
//! bakefs mkdir build/obj/debug          # creates missing parents, no-op if present
//! bakefs cp '$HOME/tpl' out/tpl          # recursive, permissions preserved
//! bakefs ln build/libfoo.so dist/libfoo.so
//! bakefs rm build                        # succeeds even if build is gone
//! ```
//!
//! `mkdir` uses `fs.dir_mode` from the configuration. `cp` and `ln` expand
//! `~` / `$VAR` in their arguments unless `fs.expand_env` is `false`.
//!
use anyhow::Result;
use bakefs::core::config::Config;
use bakefs::{EnvExpander, ShellEnv, Verbatim};
use clap::Parser;

/// Arguments for `bakefs mkdir`.
#[derive(Parser, Debug)]
pub struct MkdirArgs {
    /// Directories to create (with any missing parents).
    #[arg(required = true)]
    paths: Vec<String>,
}

/// Arguments for `bakefs cp`.
#[derive(Parser, Debug)]
pub struct CpArgs {
    /// File or directory to copy.
    src: String,
    /// Destination path, or an existing directory to copy a file into.
    dst: String,
}

/// Arguments for `bakefs rm`.
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Files, links or directory trees to remove.
    #[arg(required = true)]
    paths: Vec<String>,
}

/// Arguments for `bakefs mv`.
#[derive(Parser, Debug)]
pub struct MvArgs {
    old_path: String,
    new_path: String,
}

/// Arguments for `bakefs ln`.
#[derive(Parser, Debug)]
pub struct LnArgs {
    /// What the link points to (relative targets are made absolute).
    target: String,
    /// Where the link is created.
    link_path: String,
}

/// Arguments for `bakefs touch`.
#[derive(Parser, Debug)]
pub struct TouchArgs {
    #[arg(required = true)]
    paths: Vec<String>,
}

fn expander(cfg: &Config) -> &'static dyn EnvExpander {
    static SHELL: ShellEnv = ShellEnv;
    static VERBATIM: Verbatim = Verbatim;
    if cfg.fs.expand_env {
        &SHELL as &dyn EnvExpander
    } else {
        &VERBATIM
    }
}

pub fn handle_mkdir(args: MkdirArgs, cfg: &Config) -> Result<()> {
    let mode = cfg.fs.dir_mode_bits()?;
    for path in &args.paths {
        bakefs::mkdir_with_mode(path, mode)?;
    }
    Ok(())
}

pub fn handle_cp(args: CpArgs, cfg: &Config) -> Result<()> {
    bakefs::copy_with(&args.src, &args.dst, expander(cfg))?;
    Ok(())
}

pub fn handle_rm(args: RmArgs, _cfg: &Config) -> Result<()> {
    for path in &args.paths {
        bakefs::remove(path)?;
    }
    Ok(())
}

pub fn handle_mv(args: MvArgs, _cfg: &Config) -> Result<()> {
    bakefs::rename(&args.old_path, &args.new_path)?;
    Ok(())
}

pub fn handle_ln(args: LnArgs, cfg: &Config) -> Result<()> {
    bakefs::symlink_with(&args.target, &args.link_path, expander(cfg))?;
    Ok(())
}

pub fn handle_touch(args: TouchArgs, _cfg: &Config) -> Result<()> {
    for path in &args.paths {
        bakefs::touch(path)?;
    }
    Ok(())
}
