//! # bakefs Copy Operations
//!
//! File: cli/src/common/fs/copy.rs
//!
//! ## Overview
//!
//! `copy` replicates a file or a directory tree. It is "replace", not
//! "merge", at the file level: a destination file that already exists is
//! removed before the new content is written.
//!
//! ## Architecture
//!
//! `copy` expands environment placeholders in both arguments, checks that
//! the source exists, and dispatches on whether it is a directory:
//!
//! - **File copy**
//!   - Copying a file onto an existing directory writes `dst/<basename>`.
//!   - If that target is the source itself (`copy("d/a", "d")`,
//!     `copy(x, x)`), nothing is done.
//!   - A pre-existing destination is removed first.
//!   - If the destination cannot be created because its directory is
//!     missing, that directory is created (`mkdir`) and the create is
//!     retried once.
//!   - The source's permission bits are reapplied to the destination. A
//!     failure to do so fails the copy.
//! - **Directory copy**: creates the destination directory, then walks the
//!   source with a plain `DirIterator`, recursing into subdirectories
//!   (`dst/<name>`) and file-copying everything else into `dst`. The
//!   current source directory is tracked on a `DirStack`. The first error
//!   stops the copy; entries already copied stay in place.
//!
//! Plain iteration skips names starting with `.`, so hidden entries inside a
//! copied directory are not copied. A directory reached a second time
//! through a link (for example `self -> .`) is not copied again. A read
//! error part-way through a source directory fails the copy.
//!
//! ## Usage
//!
//! ```rust
//! use bakefs::common::fs::copy;
//!
//! # fn run() -> bakefs::Result<()> {
//! copy::copy("include", "$BAKE_HOME/include/myproject")?;
//! copy::copy("bin/tool", "dist/bin/tool")?; // creates dist/bin, mode preserved
//! copy::copy("README", "dist")?;            // dist exists -> dist/README
//! # Ok(())
//! # }
//! ```
//!
use crate::common::env::{EnvExpander, ShellEnv};
use crate::common::fs::dirstack::DirStack;
use crate::common::fs::iter::open_dir_iter;
use crate::common::fs::{io, path, probe};
use crate::core::error::{ErrorKind, FsError, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Copies `src` to `dst`, expanding environment placeholders with
/// [`ShellEnv`]. See the module docs for the exact behavior.
///
/// # Errors
///
/// - `InvalidArgument` if either argument is empty or fails to expand.
/// - `NotFound` if `src` does not exist.
/// - The first failure while creating, writing or chmod-ing a destination.
pub fn copy(src: &str, dst: &str) -> Result<()> {
    copy_with(src, dst, &ShellEnv)
}

/// [`copy`] with a caller-supplied environment expander.
pub fn copy_with(src: &str, dst: &str, env: &dyn EnvExpander) -> Result<()> {
    if src.is_empty() || dst.is_empty() {
        return Err(FsError::invalid("cp", "source and destination are required"));
    }
    let src = env.expand(src)?;
    let dst = env.expand(dst)?;

    if !probe::exists(&src) {
        return Err(FsError::failed(
            ErrorKind::NotFound,
            "cp",
            &src,
            "source does not exist",
        ));
    }

    if probe::is_directory(&src) {
        copy_dir(&src, &dst)?;
    } else {
        copy_file(&src, &dst)?;
    }

    info!("cp {} {}", src, dst);
    Ok(())
}

/// Copies the regular file `src` to `dst` (or into `dst` if it is a
/// directory), preserving permission bits.
fn copy_file(src: &str, dst: &str) -> Result<()> {
    let target = if probe::is_directory(dst) {
        path::join(dst, path::basename(src))
    } else {
        dst.to_string()
    };

    if probe::same_file(src, &target) {
        debug!("{} and {} are the same file, nothing to copy", src, target);
        return Ok(());
    }
    if probe::exists(&target) {
        debug!("Replacing existing {}", target);
        io::remove(&target).map_err(|e| FsError::nested("cp", &target, e))?;
    }

    let mut reader = File::open(src).map_err(|e| FsError::io("cp", src, e))?;
    let perm = probe::get_permissions(src)?;

    let mut writer = match File::create(&target) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let parent = path::dirname(&target)?;
            if parent.is_empty() {
                return Err(FsError::io("cp", &target, e));
            }
            warn!("Destination directory {} missing, creating it", parent);
            io::mkdir(&parent).map_err(|inner| FsError::nested("cp", &target, inner))?;
            File::create(&target).map_err(|e| FsError::io("cp", &target, e))?
        }
        Err(e) => return Err(FsError::io("cp", &target, e)),
    };

    let bytes = std::io::copy(&mut reader, &mut writer)
        .map_err(|e| FsError::io("cp", &target, e))?;
    writer
        .sync_all()
        .map_err(|e| FsError::io("cp", &target, e))?;
    drop(writer);

    probe::set_permissions(&target, perm).map_err(|e| FsError::nested("cp", &target, e))?;
    debug!("Copied {} bytes {} -> {} ({:o})", bytes, src, target, perm);
    Ok(())
}

/// Copies the directory `src` into a directory at `dst`.
fn copy_dir(src: &str, dst: &str) -> Result<()> {
    io::mkdir(dst)?;
    let mut visited = HashSet::new();
    visited.insert(canonical(src)?);
    let mut stack = DirStack::push(None, src);
    copy_dir_contents(&mut stack, dst, &mut visited)
}

fn canonical(dir: &str) -> Result<PathBuf> {
    fs::canonicalize(dir).map_err(|e| FsError::io("cp", dir, e))
}

fn copy_dir_contents(
    stack: &mut DirStack,
    dst: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<()> {
    let wd = stack.current_path().unwrap_or(".").to_string();
    let mut entries = open_dir_iter(Some(&wd), None)?;

    while let Some(name) = entries.try_next_entry()? {
        let from = path::join(&wd, &name);
        if probe::is_directory(&from) {
            if !visited.insert(canonical(&from)?) {
                warn!("Not copying {}: directory already copied through another path", from);
                continue;
            }
            let to = path::join(dst, &name);
            io::mkdir(&to)?;
            let mut frame = stack.enter(&name);
            copy_dir_contents(&mut frame, &to, visited)?;
        } else {
            copy_file(&from, dst)?;
        }
    }
    Ok(())
}
