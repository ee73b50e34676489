//! # bakefs Entry Probes
//!
//! File: cli/src/common/fs/probe.rs
//!
//! ## Overview
//!
//! Stateless queries against the filesystem. `exists`, `is_directory` and
//! `is_symlink` are best-effort: a path that cannot be stat'ed simply
//! answers `false`, it is never an error on its own. The permission and
//! timestamp probes do report failures, since callers act on the value.
//!
//! ## Permission bits
//!
//! Permission bits are the POSIX mode bits (`0o7777` mask) on Unix. On other
//! platforms only the read-only flag is representable, so it is mapped to
//! `0o444` / `0o644` and back.
//!
use crate::core::error::{FsError, Result};
use std::fs;
use std::time::SystemTime;
use tracing::debug;

/// Returns `true` if anything exists at `path`.
///
/// A final symlink is not followed, so a dangling link still exists.
pub fn exists(path: &str) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Returns `true` if `path` is a directory, following symlinks.
///
/// A nonexistent or unreadable path yields `false`.
pub fn is_directory(path: &str) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Returns `true` if `path` itself is a symbolic link.
pub fn is_symlink(path: &str) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Returns `true` if `a` and `b` resolve to the same filesystem entry
/// (after following links and `..`). Either path missing yields `false`.
pub fn same_file(a: &str, b: &str) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Reads the permission bits of `path`.
///
/// # Errors
///
/// Returns the stat failure (`NotFound`, `PermissionDenied`, ...) with the
/// OS cause attached.
pub fn get_permissions(path: &str) -> Result<u32> {
    let meta = fs::metadata(path).map_err(|e| FsError::io("getperm", path, e))?;

    #[cfg(unix)]
    let bits = {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o7777
    };
    #[cfg(not(unix))]
    let bits = if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    };

    debug!("getperm {} -> {:o}", path, bits);
    Ok(bits)
}

/// Applies permission bits to `path`.
///
/// # Errors
///
/// Returns the chmod failure with the OS cause attached.
pub fn set_permissions(path: &str, bits: u32) -> Result<()> {
    debug!("setperm {} {:o}", path, bits);

    #[cfg(unix)]
    let perms = {
        use std::os::unix::fs::PermissionsExt;
        fs::Permissions::from_mode(bits)
    };
    #[cfg(not(unix))]
    let perms = {
        let mut p = fs::metadata(path)
            .map_err(|e| FsError::io("setperm", path, e))?
            .permissions();
        p.set_readonly(bits & 0o222 == 0);
        p
    };

    fs::set_permissions(path, perms).map_err(|e| FsError::io("setperm", path, e))
}

/// Returns the last-modified time of `path`.
///
/// # Errors
///
/// Returns the stat failure with the OS cause attached.
pub fn last_modified(path: &str) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| FsError::io("stat", path, e))
}
