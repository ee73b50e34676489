//! # bakefs Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Each
//! `.rs` file here (other than this module) is compiled as its own test
//! crate, linked against the `bakefs` library and able to run the `bakefs`
//! binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// # Get bakefs Command (`bakefs_cmd`)
///
/// Returns an `assert_cmd::Command` for the `bakefs` binary built for this
/// test run. `RUST_LOG` is cleared so log output does not depend on the
/// caller's environment.
///
/// ## Panics
/// Panics if the `bakefs` binary cannot be found via `Command::cargo_bin`.
pub fn bakefs_cmd() -> Command {
    let mut cmd = Command::cargo_bin("bakefs").expect("Failed to find bakefs binary for testing");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Joins `rel` onto `base` and returns it as a `String`, the path type the
/// library works with.
pub fn path_str(base: &Path, rel: &str) -> String {
    base.join(rel).to_string_lossy().into_owned()
}
