//! # bakefs Library Root
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! bakefs is the filesystem layer of the bake build tool. It provides:
//!
//! - Self-healing, idempotent `mkdir`, `remove` and `symlink`.
//! - File and recursive directory `copy` that preserves permission bits.
//! - `open_dir_iter`, a lazy directory cursor that can be narrowed by a
//!   compiled filter and, for recursive filters, covers a whole subtree.
//!
//! Every operation is synchronous and runs on the caller's thread. Errors
//! are `FsError` values classified by `ErrorKind`.
//!
//! ## Architecture
//!
//! - `core`: error types and configuration loading.
//! - `common::fs`: paths, probes, the directory stack, iteration and mutations.
//! - `common::filter` / `common::env`: the filter and environment-expansion
//!   capabilities the filesystem layer consumes.
//!
//! The functions callers need are re-exported here.
//!
pub mod common;
pub mod core;

pub use crate::common::env::{EnvExpander, ShellEnv, Verbatim};
pub use crate::common::filter::{FilterCompiler, FilterProgram, GlobCompiler, Scope};
pub use crate::common::fs::copy::{copy, copy_with};
pub use crate::common::fs::dirstack::DirStack;
pub use crate::common::fs::io::{chdir, cwd, mkdir, mkdir_with_mode, remove, rename, touch};
pub use crate::common::fs::iter::{
    dir_is_empty, list_dir, open_dir_iter, open_dir_iter_with, DirIterator,
};
pub use crate::common::fs::links::{symlink, symlink_with};
pub use crate::common::fs::probe::{
    exists, get_permissions, is_directory, is_symlink, last_modified, set_permissions,
};
pub use crate::core::error::{ErrorKind, FsError, Result};
