//! # bakefs Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!

//! ## Overview
//!
//! Shared building blocks of the crate:
//!
//! - **`fs`**: The filesystem layer itself (paths, probes, iteration, mutations).
//! - **`filter`**: The filter-expression capability consumed by directory
//!   iteration, with a glob-based default compiler.
//! - **`env`**: The environment-expansion capability applied to user-supplied
//!   paths before `copy` and `symlink`.
//!

/// Environment placeholder expansion (`EnvExpander`, `ShellEnv`).
pub mod env;
/// Compiled filter programs (`FilterCompiler`, `FilterProgram`, `Scope`).
pub mod filter;
/// Filesystem operations (copy, io, iter, links, ...).
pub mod fs;
