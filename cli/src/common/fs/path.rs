//! # bakefs Path Utilities
//!
//! File: cli/src/common/fs/path.rs
//!
//! ## Overview
//!
//! Pure string-level path manipulation. Nothing in this module touches the
//! filesystem; every function is a transformation of its input string.
//! All path comparison and concatenation elsewhere in the crate goes
//! through `clean` and `join` so that paths built during recursive
//! traversal never accumulate `//`, `./` or trailing separators.
//!
//! Paths are treated as `/`-separated strings. This matches the POSIX-like
//! semantics the rest of the crate assumes.
//!
use crate::core::error::{FsError, Result};

/// Normalizes a path string.
///
/// - Repeated separators collapse to one.
/// - `.` segments are dropped.
/// - `name/..` pairs are resolved; leading `..` segments on relative paths
///   are kept, and `..` never ascends above `/` on absolute paths.
/// - Trailing separators are removed (except for the root `/`).
///
/// An empty input, or a relative path that resolves to nothing, yields `"."`.
///
/// Returns a new owned string, so it is safe to write the result back over
/// the variable that held the input.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {} // Already at root.
                _ => segments.push(".."),
            },
            name => segments.push(name),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Returns the prefix of `path` before its last separator.
///
/// Trailing separators are ignored (`"a/b/"` yields `"a"`). A path whose
/// only separator is the leading root yields `"/"`. Returns `None` when the
/// path contains no separator at all, i.e. there is no parent segment to
/// strip.
pub fn strip_last_segment(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    let idx = trimmed.rfind('/')?;
    let prefix = trimmed[..idx].trim_end_matches('/');
    if prefix.is_empty() {
        Some("/")
    } else {
        Some(prefix)
    }
}

/// Returns the parent segment of `path`.
///
/// `"a/b"` yields `"a"`, `"/a"` yields `"/"`, and a bare name such as
/// `"a"` yields `""` (no parent segment in the string).
///
/// # Errors
///
/// Returns `InvalidArgument` if `path` is empty.
pub fn dirname(path: &str) -> Result<String> {
    if path.is_empty() {
        return Err(FsError::invalid("dirname", "empty path"));
    }
    Ok(strip_last_segment(path).unwrap_or("").to_string())
}

/// Returns the final segment of `path`, ignoring trailing separators.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Concatenates `base` and `name` with a separator and cleans the result.
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        return clean(name);
    }
    clean(&format!("{}/{}", base, name))
}
