//! # bakefs Directory and Entry Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module holds the mutation primitives that create, remove and move
//! filesystem entries. Each one states a post-condition and treats a
//! filesystem that already satisfies it as success:
//!
//! - **`mkdir`**: "a directory exists at `path`". An existing directory is
//!   left alone; an existing non-directory is removed and replaced; missing
//!   parents are created (by recursing on the path with its last segment
//!   stripped) and creation is retried once.
//! - **`remove`**: "nothing exists at `path`". A missing path is success.
//!   The entry is removed directly first, so a symlink to a directory only
//!   loses the link. A non-empty real directory falls back to a
//!   depth-first tree removal.
//! - **`rename`**: plain rename, errors reported with the OS cause.
//! - **`touch`**: creates an empty file if missing; never truncates.
//!
//! `cwd` and `chdir` wrap the process working directory. `cwd` returns an
//! owned string per call.
//!
//! ## Usage
//!
//! ```rust
//! use bakefs::common::fs::io;
//!
//! # fn run() -> bakefs::Result<()> {
//! io::mkdir("out/obj/debug")?; // creates out, out/obj, out/obj/debug
//! io::mkdir("out/obj/debug")?; // no-op
//! io::touch("out/obj/debug/.stamp")?;
//! io::remove("out")?;          // whole tree
//! io::remove("out")?;          // already gone, still Ok
//! # Ok(())
//! # }
//! ```
//!
use crate::common::fs::{path, probe};
use crate::core::error::{ErrorKind, FsError, Result};
use std::fs;
use std::io;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Mode used for directories created by `mkdir`.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Ensures a directory exists at `path`, creating missing parents.
/// Directories are created with [`DEFAULT_DIR_MODE`].
///
/// # Errors
///
/// - `InvalidArgument` if `path` is empty.
/// - The removal failure if a non-directory occupies `path` and cannot be
///   removed.
/// - The creation failure if the directory (or, after stripping segments,
///   a parent) cannot be created. A path with no separator left to strip
///   cannot be healed and reports the original `NotFound`.
pub fn mkdir(path: &str) -> Result<()> {
    mkdir_with_mode(path, DEFAULT_DIR_MODE)
}

/// [`mkdir`] with an explicit mode for every directory it creates.
pub fn mkdir_with_mode(path: &str, mode: u32) -> Result<()> {
    if path.is_empty() {
        return Err(FsError::invalid("mkdir", "empty path"));
    }

    if probe::exists(path) {
        if probe::is_directory(path) {
            debug!("Directory already exists: {}", path);
            return Ok(());
        }
        warn!("Replacing non-directory at {} with a directory", path);
        remove(path).map_err(|e| FsError::nested("mkdir", path, e))?;
    }

    match create_dir(path, mode) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // A prefix is missing: create it, then retry once.
            let parent = match path::strip_last_segment(path) {
                Some(parent) => parent,
                None => return Err(FsError::io("mkdir", path, e)),
            };
            debug!("Parent of {} missing, creating {}", path, parent);
            mkdir_with_mode(parent, mode).map_err(|inner| FsError::nested("mkdir", path, inner))?;
            match create_dir(path, mode) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(FsError::io("mkdir", path, e)),
            }
        }
        // Someone else created it first; the directory exists either way.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            debug!("Directory appeared concurrently: {}", path);
            return Ok(());
        }
        Err(e) => return Err(FsError::io("mkdir", path, e)),
    }

    info!("mkdir {}", path);
    Ok(())
}

fn create_dir(path: &str, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

/// Removes whatever is at `path`.
///
/// Files, symlinks (including links to directories) and empty directories
/// are removed directly. A non-empty directory that is not a link is
/// removed recursively, children before parents.
///
/// # Errors
///
/// - `InvalidArgument` if `path` is empty.
/// - The first removal failure, with the OS cause. A nonexistent `path` is
///   not an error.
pub fn remove(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FsError::invalid("rm", "empty path"));
    }

    match remove_entry(path) {
        Ok(()) => {
            info!("rm {}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Nothing to remove at {}", path);
            Ok(())
        }
        Err(e) => {
            if probe::is_directory(path) && !probe::is_symlink(path) {
                debug!("{} is a non-empty directory ({}), removing tree", path, e);
                remove_tree(path)?;
                info!("rm {} (D)", path);
                Ok(())
            } else {
                Err(FsError::io("rm", path, e))
            }
        }
    }
}

/// Single-entry removal. Does not follow a final symlink.
fn remove_entry(path: &str) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Removes the tree under `root` depth-first, never following links.
fn remove_tree(root: &str) -> Result<()> {
    for entry in WalkDir::new(root).follow_links(false).contents_first(true) {
        let entry = entry.map_err(|e| {
            let at = e
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| root.to_string());
            match e.into_io_error() {
                Some(source) => FsError::io("rmtree", at, source),
                None => FsError::failed(ErrorKind::IoFailure, "rmtree", at, "filesystem loop"),
            }
        })?;

        let p = entry.path();
        let removed = if entry.file_type().is_dir() {
            fs::remove_dir(p)
        } else {
            fs::remove_file(p)
        };
        removed.map_err(|e| FsError::io("rmtree", p.display().to_string(), e))?;
    }
    Ok(())
}

/// Renames `old_path` to `new_path`.
///
/// # Errors
///
/// Returns the rename failure with the OS cause.
pub fn rename(old_path: &str, new_path: &str) -> Result<()> {
    fs::rename(old_path, new_path)
        .map_err(|e| FsError::io("rename", format!("{} -> {}", old_path, new_path), e))?;
    info!("mv {} {}", old_path, new_path);
    Ok(())
}

/// Creates `path` as an empty file if it does not exist. Existing content
/// is kept.
pub fn touch(path: &str) -> Result<()> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FsError::io("touch", path, e))?;
    debug!("touch {}", path);
    Ok(())
}

/// Returns the current working directory.
pub fn cwd() -> Result<String> {
    let dir = std::env::current_dir().map_err(|e| FsError::io("getcwd", ".", e))?;
    Ok(dir.to_string_lossy().into_owned())
}

/// Changes the process working directory.
pub fn chdir(path: &str) -> Result<()> {
    std::env::set_current_dir(path).map_err(|e| FsError::io("chdir", path, e))
}
