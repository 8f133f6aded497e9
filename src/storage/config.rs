//! Configuration handling for the shift ledger
//!
//! Configuration is stored in `.shift/config.toml` (workspace) and
//! `~/.config/shift-ledger/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DEFAULT_FORWARD_MONTH_LIMIT, DEFAULT_MIN_STAFF_PER_DAY, DEFAULT_STAFF_NAME};

/// Default file name for CSV exports
pub const DEFAULT_EXPORT_FILE_NAME: &str = "shift_schedule.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Workspace-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Days with fewer WORK staff than this are flagged as understaffed
    pub min_staff_per_day: usize,

    /// How many months past the current one may be planned
    pub forward_month_limit: u32,

    /// Name given to staff added without one
    pub default_staff_name: String,

    /// File name used by `shift export` when no output path is given
    pub export_file_name: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            min_staff_per_day: DEFAULT_MIN_STAFF_PER_DAY,
            forward_month_limit: DEFAULT_FORWARD_MONTH_LIMIT,
            default_staff_name: DEFAULT_STAFF_NAME.to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl WorkspaceConfig {
    /// Rejects values that would make the workspace unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_staff_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_staff_name must not be empty".to_string(),
            ));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "export_file_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + workspace)
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: WorkspaceConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration for a specific workspace
    pub fn for_workspace(root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let workspace = Self::load_workspace_config(root)?;

        Ok(Self { workspace, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "shift", "shift-ledger")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads workspace configuration from a specific root
    fn load_workspace_config(root: &Path) -> Result<WorkspaceConfig> {
        let config_path = root.join(".shift").join("config.toml");

        if !config_path.exists() {
            return Ok(WorkspaceConfig::default());
        }

        let content = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read workspace config: {}", config_path.display())
        })?;

        let config: WorkspaceConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse workspace config")?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the workspace root by looking for a `.shift/` directory
    pub fn find_workspace_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let shift_dir = current.join(".shift");
            if shift_dir.is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}
