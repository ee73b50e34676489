//! # bakefs Filesystem Layer (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!

//! ## Overview
//!
//! This module groups everything that touches (or reasons about) the
//! filesystem. Components, leaves first:
//!
//! - **`path`**: Pure string operations: `clean`, `dirname`, `basename`, `join`.
//! - **`probe`**: Best-effort queries (`exists`, `is_directory`, `is_symlink`) and
//!   the permission and modification-time probes.
//! - **`dirstack`**: Stack of working paths for recursive traversal, with a
//!   guard that pops on every exit path.
//! - **`iter`**: `open_dir_iter` and the three `DirIterator` variants (plain,
//!   flat-filtered, recursive-filtered).
//! - **`io`**: `mkdir`, `remove`, `rename`, `touch`, `cwd`, `chdir`.
//! - **`copy`**: File and recursive directory copy.
//! - **`links`**: Idempotent `symlink`.
//!
//! Mutations read directories only through `iter`, classify entries through
//! `probe`, and build paths through `path`.
//!
//! ## Usage
//!
//! ```rust
//! use bakefs::common::fs::{copy, io, iter, links};
//!
//! # fn run() -> bakefs::Result<()> {
//! io::mkdir("build/obj")?;
//! copy::copy("src/config.h", "build/include/config.h")?;
//! links::symlink("build/libfoo.so", "dist/libfoo.so")?;
//! for obj in iter::open_dir_iter(Some("build"), Some("//*.o"))? {
//!     println!("{}", obj);
//! }
//! # Ok(())
//! # }
//! ```
//!

/// File and directory copy (`copy`).
pub mod copy;
/// Scope-guarded stack of traversal paths (`DirStack`, `DirFrame`).
pub mod dirstack;
/// Create, remove, rename and touch entries (`mkdir`, `remove`, ...).
pub mod io;
/// Directory iteration (`open_dir_iter`, `DirIterator`).
pub mod iter;
/// Symbolic links (`symlink`).
pub mod links;
/// String-level path helpers.
pub mod path;
/// Stateless filesystem queries.
pub mod probe;
