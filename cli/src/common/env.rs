//! # bakefs Environment Expansion
//!
//! File: cli/src/common/env.rs
//!
//! ## Overview
//!
//! User-supplied source and destination strings for `copy` and `symlink`
//! may contain environment-style placeholders. They are expanded before the
//! filesystem is touched:
//!
//! - `~` / `~/...` to the home directory
//! - `$VAR` and `${VAR}` to the variable's value
//!
//! Expansion goes through the `EnvExpander` trait so the host build system
//! can supply its own variable source. `ShellEnv` is the default and uses
//! the process environment via `shellexpand`.
//!
use crate::core::error::{FsError, Result};
use tracing::debug;

/// Expands placeholders in a path string.
pub trait EnvExpander {
    /// # Errors
    ///
    /// Returns `InvalidArgument` naming the variable if a placeholder cannot
    /// be resolved.
    fn expand(&self, input: &str) -> Result<String>;
}

/// Expands against the process environment and home directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellEnv;

impl EnvExpander for ShellEnv {
    fn expand(&self, input: &str) -> Result<String> {
        let expanded = shellexpand::full(input).map_err(|e| {
            FsError::invalid(
                "expand",
                format!("cannot expand '{}': ${}: {}", input, e.var_name, e.cause),
            )
        })?;
        if expanded != input {
            debug!("Expanded '{}' -> '{}'", input, expanded);
        }
        Ok(expanded.into_owned())
    }
}

/// Passes input through unchanged, for callers that have already expanded
/// their paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl EnvExpander for Verbatim {
    fn expand(&self, input: &str) -> Result<String> {
        Ok(input.to_string())
    }
}

/// Expands `input` with [`ShellEnv`].
pub fn expand(input: &str) -> Result<String> {
    ShellEnv.expand(input)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn test_plain_path_unchanged() -> Result<()> {
        assert_eq!(expand("src/lib.rs")?, "src/lib.rs");
        Ok(())
    }

    #[test]
    fn test_expands_variables() -> Result<()> {
        let path = std::env::var("PATH").unwrap_or_default();
        if !path.is_empty() {
            assert_eq!(expand("${PATH}")?, path);
        }
        Ok(())
    }

    #[test]
    fn test_expands_tilde() -> Result<()> {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand("~/bake/out")?,
                home.join("bake/out").to_string_lossy()
            );
        }
        Ok(())
    }

    #[test]
    fn test_verbatim_keeps_placeholders() -> Result<()> {
        assert_eq!(Verbatim.expand("$HOME/~x")?, "$HOME/~x");
        Ok(())
    }

    #[test]
    fn test_undefined_variable_is_invalid_argument() {
        let err = expand("$BAKEFS_SURELY_UNDEFINED_VAR/x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("BAKEFS_SURELY_UNDEFINED_VAR"));
    }
}
