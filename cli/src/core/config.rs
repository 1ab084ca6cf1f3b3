//! # packchain Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads, merges and validates the optional TOML configuration. Nothing in the
//! configuration is required; with no files present the defaults reproduce the
//! plain command-line behaviour.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.packchain.toml` in the current directory or ancestors
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//! 3. Default values defined in the code
//!
//! Command-line flags override all of these.
//!
//! ```toml
//! [defaults]
//! format = "auto"
//! informative = false
//! scratch_dir = "~/tmp"
//!
//! [tools]
//! gzip = "pigz"
//! ```
//!
use crate::common::archive::registry::is_known_key;
use crate::common::archive::resolver::AUTO;
use crate::core::error::{PackError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    /// Family key -> program to run instead of the registry default.
    #[serde(default)]
    pub tools: HashMap<String, String>,
}

/// Defaults for `packchain compress` flags.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Format used when `--format` is not given.
    #[serde(default = "default_format")]
    pub format: String,
    /// Print the resolved plan before running.
    #[serde(default)]
    pub informative: bool,
    /// Directory for scratch artifacts (can use ~). Will be expanded.
    #[serde(default)]
    pub scratch_dir: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            format: default_format(),
            informative: false,
            scratch_dir: None,
        }
    }
}

fn default_format() -> String {
    AUTO.to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".packchain.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&mut merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "packchain", "packchain") {
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
        debug!("No project configuration file (.packchain.toml) found.");
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

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project) = project else {
        return user;
    };
    let mut merged = Config::default();
    merged.defaults.format = if project.defaults.format != default_format() {
        project.defaults.format
    } else {
        user.defaults.format
    };
    merged.defaults.informative = project.defaults.informative || user.defaults.informative;
    merged.defaults.scratch_dir = project.defaults.scratch_dir.or(user.defaults.scratch_dir);
    // per-key: project entries replace user entries
    merged.tools = user.tools;
    merged.tools.extend(project.tools);
    merged
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = &mut config.defaults.scratch_dir {
        let expanded = shellexpand::tilde(dir.as_str()).into_owned();
        *dir = expanded;
        debug!("Expanded scratch directory: {}", dir);
    }
}

fn validate_config(config: &mut Config) -> Result<()> {
    for key in config.tools.keys() {
        if !is_known_key(key) {
            return Err(anyhow!(PackError::Config(format!(
                "[tools] names unknown format '{}'",
                key
            ))));
        }
    }
    for (key, program) in &config.tools {
        if program.trim().is_empty() {
            return Err(anyhow!(PackError::Config(format!(
                "[tools] entry for '{}' is empty",
                key
            ))));
        }
    }
    if let Some(dir) = config.defaults.scratch_dir.clone() {
        let path = PathBuf::from(&dir);
        if !path.exists() {
            warn!(
                "Configured scratch directory '{}' does not exist; using the system temp directory.",
                dir
            );
            config.defaults.scratch_dir = None;
        } else if !path.is_dir() {
            return Err(anyhow!(PackError::Config(format!(
                "Configured scratch path '{}' exists but is not a directory.",
                dir
            ))));
        }
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
            [defaults]
            format = "tar.xz"
            informative = true

            [tools]
            gzip = "pigz"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");
        assert_eq!(config.defaults.format, "tar.xz");
        assert!(config.defaults.informative);
        assert_eq!(config.defaults.scratch_dir, None);
        assert_eq!(config.tools.get("gzip").map(String::as_str), Some("pigz"));
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.defaults, Defaults::default());
        assert_eq!(config.defaults.format, AUTO);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<Config>("[defaults]\nlevel = 9\n").is_err());
    }

    #[test]
    fn test_merge_project_over_user() {
        let mut user = Config::default();
        user.defaults.format = "tar.gz".into();
        user.defaults.scratch_dir = Some("/user/tmp".into());
        user.tools.insert("gzip".into(), "pigz".into());
        user.tools.insert("xz".into(), "pixz".into());

        let mut project = Config::default();
        project.tools.insert("xz".into(), "xz".into());

        let merged = merge_configs(user, Some(project));
        assert_eq!(merged.defaults.format, "tar.gz");
        assert_eq!(merged.defaults.scratch_dir.as_deref(), Some("/user/tmp"));
        assert_eq!(merged.tools["gzip"], "pigz");
        assert_eq!(merged.tools["xz"], "xz");
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config::default();
        config.defaults.scratch_dir = Some("~/scratch".into());
        expand_config_paths(&mut config);
        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.defaults.scratch_dir.unwrap(),
            home_dir.join("scratch").to_string_lossy()
        );
    }

    #[test]
    fn test_validate_unknown_tool_key() {
        let mut config = Config::default();
        config.tools.insert("lz4".into(), "lz4".into());
        let result = validate_config(&mut config);
        assert!(result.unwrap_err().to_string().contains("unknown format 'lz4'"));
    }

    #[test]
    fn test_validate_missing_scratch_dir_falls_back() {
        let mut config = Config::default();
        config.defaults.scratch_dir = Some("/definitely/not/here/12345".into());
        validate_config(&mut config).unwrap();
        assert_eq!(config.defaults.scratch_dir, None);
    }

    #[test]
    fn test_validate_scratch_path_is_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("not_a_dir");
        fs::write(&file_path, "").unwrap();

        let mut config = Config::default();
        config.defaults.scratch_dir = Some(file_path.to_string_lossy().into_owned());
        let result = validate_config(&mut config);
        assert!(result.unwrap_err().to_string().contains("is not a directory"));
    }

    #[test]
    fn test_find_project_config() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        fs::create_dir(root.path().join(".git")).unwrap();

        assert_eq!(
            find_project_config_path(&nested),
            Some(root.path().join(PROJECT_CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_project_search_stops_at_git() {
        let root = tempdir().unwrap();
        let repo = root.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();
        assert_eq!(find_project_config_path(&repo), None);
    }
}
