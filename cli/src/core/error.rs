//! # bakefs Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error type returned by every filesystem operation
//! in the crate. Callers (the build-project model, the `bakefs` binary) get a
//! structured error they can branch on via [`FsError::kind`], and a single
//! human-readable message combining the operation, the path, and the
//! underlying cause via `Display`.
//!
//! ## Architecture
//!
//! - `ErrorKind`: The coarse classification callers match on.
//! - `FsError`: A `thiserror` enum. The `Io` variant always carries the
//!   originating `std::io::Error` as its `source`, so the system cause is
//!   never discarded.
//! - `Result<T>`: Alias for `std::result::Result<T, FsError>`.
//!
//! The binary wraps these in `anyhow::Error` with extra context, the same
//! way the rest of the application layer handles errors.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use bakefs::{mkdir, ErrorKind};
//!
//! match mkdir("/proc/forbidden/dir") {
//!     Ok(()) => {}
//!     Err(e) if e.kind() == ErrorKind::PermissionDenied => eprintln!("{e}"),
//!     Err(e) => eprintln!("mkdir failed: {e}"),
//! }
//! ```
//!
use std::fmt;
use std::io;
use thiserror::Error;

/// Classification of a filesystem failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument was missing or empty.
    InvalidArgument,
    /// The path an operation requires does not exist.
    NotFound,
    /// A conflict that could not be resolved by replace/retry.
    AlreadyExists,
    /// The OS refused access.
    PermissionDenied,
    /// Any other read/write/seek/stat failure.
    IoFailure,
    /// A filter pattern could not be compiled.
    FilterCompileError,
}

impl ErrorKind {
    /// Maps a standard library I/O error kind onto the crate's classification.
    pub fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            io::ErrorKind::InvalidInput => ErrorKind::InvalidArgument,
            _ => ErrorKind::IoFailure,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::NotFound => "not found",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::IoFailure => "I/O failure",
            ErrorKind::FilterCompileError => "filter compile error",
        };
        f.write_str(s)
    }
}

/// Error returned by every operation in the crate.
#[derive(Error, Debug)]
pub enum FsError {
    /// A system call failed; `source` is the OS error.
    #[error("{op} '{path}': {source}")]
    Io {
        kind: ErrorKind,
        op: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    /// A required argument was missing or malformed.
    #[error("{op}: invalid argument: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    /// An operation failed for a reason detected by the crate itself.
    #[error("{op} '{path}': {reason}")]
    Failed {
        kind: ErrorKind,
        op: &'static str,
        path: String,
        reason: String,
    },

    /// A filter pattern was rejected by the filter compiler.
    #[error("cannot compile filter '{pattern}': {reason}")]
    FilterCompile { pattern: String, reason: String },

    /// An error raised while processing an entry nested below `path`.
    #[error("{op} '{path}': {source}")]
    Nested {
        op: &'static str,
        path: String,
        #[source]
        source: Box<FsError>,
    },
}

impl FsError {
    /// Wraps an I/O error, deriving the kind from it.
    pub fn io(op: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        FsError::Io {
            kind: ErrorKind::from_io(source.kind()),
            op,
            path: path.into(),
            source,
        }
    }

    pub fn invalid(op: &'static str, reason: impl Into<String>) -> Self {
        FsError::InvalidArgument {
            op,
            reason: reason.into(),
        }
    }

    pub fn failed(
        kind: ErrorKind,
        op: &'static str,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FsError::Failed {
            kind,
            op,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attaches an outer operation/path to an error from a nested step.
    /// The kind of the innermost error is kept.
    pub fn nested(op: &'static str, path: impl Into<String>, source: FsError) -> Self {
        FsError::Nested {
            op,
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::Io { kind, .. } | FsError::Failed { kind, .. } => *kind,
            FsError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            FsError::FilterCompile { .. } => ErrorKind::FilterCompileError,
            FsError::Nested { source, .. } => source.kind(),
        }
    }

    /// The underlying OS error, if this failure came from a system call.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            FsError::Io { source, .. } => Some(source),
            FsError::Nested { source, .. } => source.io_error(),
            _ => None,
        }
    }
}

/// Result alias used by all library operations.
pub type Result<T> = std::result::Result<T, FsError>;
