//! # bakefs Symbolic Link Operations
//!
//! File: cli/src/common/fs/links.rs
//!
//! ## Overview
//!
//! `symlink` makes `link_path` a symbolic link to `target`, and is safe to
//! call repeatedly: if the link already points where it should, nothing
//! happens.
//!
//! ## Architecture
//!
//! - **Target resolution:** A relative `target` is joined onto the current
//!   working directory and cleaned before the link is made. Links therefore
//!   always hold an absolute target and do not depend on where the link
//!   itself lives.
//! - **Missing parent:** If creation fails because the link's directory is
//!   missing, the directory is created (`mkdir`) and creation is retried
//!   once.
//! - **Existing entry:** If something already occupies `link_path`, it is
//!   compared with the resolved target via `read_link`. An identical link is
//!   success. Anything else (file, directory, link elsewhere) is removed
//!   and creation is retried once.
//! - **Platform-Specific Link Creation:** `std::os::unix::fs::symlink` on
//!   Unix; on Windows `symlink_dir` or `symlink_file` depending on the
//!   target.
//!
//! The target does not have to exist.
//!
//! ## Usage
//!
//! ```rust
//! use bakefs::common::fs::links;
//!
//! # fn run() -> bakefs::Result<()> {
//! // Publish a built library under the bake home; relative target is
//! // resolved against the working directory.
//! links::symlink("bin/libfoo.so", "$BAKE_HOME/lib/libfoo.so")?;
//! # Ok(())
//! # }
//! ```
//!
use crate::common::env::{EnvExpander, ShellEnv};
use crate::common::fs::{io, path, probe};
use crate::core::error::{FsError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Makes `link_path` a symbolic link to `target`, expanding environment
/// placeholders in both with [`ShellEnv`].
///
/// # Errors
///
/// - `InvalidArgument` if either argument is empty or fails to expand.
/// - The parent creation failure, or the removal failure of a conflicting
///   entry.
/// - The link creation failure, including a failed retry.
pub fn symlink(target: &str, link_path: &str) -> Result<()> {
    symlink_with(target, link_path, &ShellEnv)
}

/// [`symlink`] with a caller-supplied environment expander.
pub fn symlink_with(target: &str, link_path: &str, env: &dyn EnvExpander) -> Result<()> {
    if target.is_empty() || link_path.is_empty() {
        return Err(FsError::invalid("symlink", "target and link path are required"));
    }
    let target = env.expand(target)?;
    let link_path = env.expand(link_path)?;
    let resolved = resolve_target(&target)?;
    create_link(&resolved, &link_path)
}

/// Makes a relative target absolute against the working directory.
fn resolve_target(target: &str) -> Result<String> {
    if target.starts_with('/') {
        Ok(target.to_string())
    } else {
        Ok(path::join(&io::cwd()?, target))
    }
}

fn create_link(target: &str, link: &str) -> Result<()> {
    match make_symlink(target, link) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let parent = path::dirname(link)?;
            if parent.is_empty() {
                return Err(FsError::io("symlink", link, e));
            }
            warn!("Directory {} for link {} missing, creating it", parent, link);
            io::mkdir(&parent).map_err(|inner| FsError::nested("symlink", link, inner))?;
            make_symlink(target, link).map_err(|e| FsError::io("symlink", link, e))?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            if points_to(link, target) {
                debug!("Symlink already exists and is correct: {} -> {}", link, target);
                return Ok(());
            }
            warn!("Replacing existing entry at {} with link to {}", link, target);
            io::remove(link).map_err(|inner| FsError::nested("symlink", link, inner))?;
            make_symlink(target, link).map_err(|e| FsError::io("symlink", link, e))?;
        }
        Err(e) => return Err(FsError::io("symlink", link, e)),
    }

    info!("symlink {} -> {}", link, target);
    Ok(())
}

/// Returns `true` if `link` is a symlink whose stored target is `target`.
fn points_to(link: &str, target: &str) -> bool {
    match fs::read_link(link) {
        Ok(existing) => existing == Path::new(target),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn make_symlink(target: &str, link: &str) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &str, link: &str) -> std::io::Result<()> {
    // Windows requires different functions for file vs. directory links.
    if probe::is_directory(target) {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn make_symlink(_target: &str, _link: &str) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

/// Returns the stored target of `link`, if it is a symlink.
pub fn read_link(link: &str) -> Option<String> {
    if !probe::is_symlink(link) {
        return None;
    }
    fs::read_link(link)
        .ok()
        .map(|p| p.to_string_lossy().into_owned())
}
