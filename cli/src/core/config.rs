//! # bakefs Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads, merges and validates the settings used by the `bakefs` binary.
//! The library functions themselves take no configuration; the binary reads
//! these settings and picks the matching library entry points (for example
//! `mkdir_with_mode` with the configured mode).
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.bakefs.toml` in the current directory or ancestors
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/bakefs/config.toml`)
//! 3. Default values defined in the code
//!
//! ```toml
//! [fs]
//! dir_mode = "750"     # octal, applied to directories `bakefs mkdir` creates
//! expand_env = true    # expand ~ / $VAR in cp and ln arguments
//!
//! [logging]
//! level = "info"       # used when no -v flag and no RUST_LOG is given
//! ```
//!
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub fs: FsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for filesystem mutations issued by the binary.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FsConfig {
    /// Octal mode string for created directories.
    #[serde(default = "default_dir_mode")]
    pub dir_mode: String,
    /// Whether `cp`/`ln` arguments go through environment expansion.
    #[serde(default = "default_expand_env")]
    pub expand_env: bool,
}

/// Logging defaults.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        FsConfig {
            dir_mode: default_dir_mode(),
            expand_env: default_expand_env(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl FsConfig {
    /// Parses `dir_mode` as octal permission bits.
    pub fn dir_mode_bits(&self) -> Result<u32> {
        let bits = u32::from_str_radix(self.dir_mode.trim_start_matches("0o"), 8)
            .with_context(|| format!("Invalid octal dir_mode '{}'", self.dir_mode))?;
        if bits > 0o7777 {
            bail!("dir_mode '{}' is out of range (max 7777)", self.dir_mode);
        }
        Ok(bits)
    }
}

fn default_dir_mode() -> String {
    "755".to_string()
}
fn default_expand_env() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".bakefs.toml";
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Loads user and project configuration, merges and validates them.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "bake", "bakefs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.bakefs.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the defaults.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    let defaults = Config::default();
    Config {
        fs: FsConfig {
            dir_mode: if project.fs.dir_mode != defaults.fs.dir_mode {
                project.fs.dir_mode
            } else {
                user.fs.dir_mode
            },
            expand_env: if project.fs.expand_env != defaults.fs.expand_env {
                project.fs.expand_env
            } else {
                user.fs.expand_env
            },
        },
        logging: LoggingConfig {
            level: if project.logging.level != defaults.logging.level {
                project.logging.level
            } else {
                user.logging.level
            },
        },
    }
}

fn validate_config(config: &Config) -> Result<()> {
    config.fs.dir_mode_bits()?;
    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        bail!(
            "Invalid logging level '{}'. Expected one of: {}.",
            config.logging.level,
            LOG_LEVELS.join(", ")
        );
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [fs]
            dir_mode = "700"

            [logging]
            level = "debug"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");
        assert_eq!(config.fs.dir_mode, "700");
        assert!(config.fs.expand_env); // Default
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.fs.dir_mode_bits().unwrap(), 0o700);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fs.dir_mode_bits().unwrap(), 0o755);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(toml::from_str::<Config>("[fs]\nmode = \"1\"").is_err());
    }

    #[test]
    fn test_merge_prefers_project_overrides() {
        let user = Config {
            fs: FsConfig {
                dir_mode: "700".into(),
                expand_env: false,
            },
            logging: LoggingConfig {
                level: "info".into(),
            },
        };
        let project = Config {
            logging: LoggingConfig {
                level: "trace".into(),
            },
            ..Default::default()
        };
        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.fs.dir_mode, "700"); // Project left the default
        assert!(!merged.fs.expand_env);
        assert_eq!(merged.logging.level, "trace");
    }

    #[test]
    fn test_validate_config() {
        assert!(validate_config(&Config::default()).is_ok());

        let mut bad_mode = Config::default();
        bad_mode.fs.dir_mode = "9x".into();
        assert!(validate_config(&bad_mode)
            .unwrap_err()
            .to_string()
            .contains("Invalid octal dir_mode"));

        let mut bad_level = Config::default();
        bad_level.logging.level = "loud".into();
        assert!(validate_config(&bad_level)
            .unwrap_err()
            .to_string()
            .contains("Invalid logging level"));
    }

    #[test]
    fn test_find_project_config_stops_at_git() {
        let temp_dir = tempdir().unwrap();
        let repo = temp_dir.path().join("repo");
        let nested = repo.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();
        // Above the repository root; must not be found.
        fs::write(temp_dir.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        assert_eq!(find_project_config_path(&nested), None);

        fs::write(repo.join("a").join(PROJECT_CONFIG_FILENAME), "[fs]\n").unwrap();
        assert_eq!(
            find_project_config_path(&nested),
            Some(repo.join("a").join(PROJECT_CONFIG_FILENAME))
        );
    }
}
