//! # bakefs Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the `bakefs` binary. Each one
//! is a thin wrapper that parses its arguments and calls the matching
//! library operation; none of them add filesystem behavior of their own.
//!
//! ## Command Groups
//!
//! - `mutate`: `mkdir`, `cp`, `rm`, `mv`, `ln`, `touch`
//! - `inspect`: `ls`, `stat`
//!
//! Each command defines its own arguments structure and handler function.
//! Handlers receive the loaded `Config` so settings such as the directory
//! mode and environment expansion apply uniformly.
//!

/// Read-only commands: `ls` and `stat`.
pub mod inspect;
/// Commands that change the filesystem: `mkdir`, `cp`, `rm`, `mv`, `ln`, `touch`.
pub mod mutate;
