//! Workspace management
//!
//! Handles workspace initialization and provides access to the state port
//! and configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, FileStatePort, Loaded, StatePort};
use crate::domain::Ledger;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in a shift workspace. Run 'shift init' first.")]
    NotInWorkspace,
}

/// A shift workspace (a directory containing `.shift/`)
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let shift_dir = root.join(".shift");

        if !shift_dir.is_dir() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        let config = Config::for_workspace(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_workspace_root().ok_or(WorkspaceError::NotInWorkspace)?;

        Self::open(root)
    }

    /// Initializes a new workspace at the given path
    ///
    /// Existing records and configuration are left untouched.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let shift_dir = root.join(".shift");

        fs::create_dir_all(&shift_dir).with_context(|| {
            format!("Failed to create .shift directory: {}", shift_dir.display())
        })?;

        // Create default config
        let config_path = shift_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Shift ledger configuration

# Days with fewer WORK staff than this are flagged as understaffed
min_staff_per_day = 3

# How many months past the current one may be planned
forward_month_limit = 2

# Name given to staff added without one
default_staff_name = "新規スタッフ"

# File written by 'shift export' when no --output is given
export_file_name = "shift_schedule.csv"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // Create .gitignore for .shift
        let gitignore_path = shift_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Interrupted writes
*.tmp

# Copies of damaged records
*.corrupt
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        let workspace = Self::open(root)?;

        // Persist the seed roster so the first run is visible on disk
        let port = workspace.state_port();
        if !port.roster_path().exists() && !port.schedule_path().exists() {
            port.save(&Ledger::seeded())?;
        }

        Ok(workspace)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .shift directory path
    pub fn shift_dir(&self) -> PathBuf {
        self.root.join(".shift")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the file-backed state port
    pub fn state_port(&self) -> FileStatePort {
        FileStatePort::for_workspace(&self.root)
    }

    /// Loads the ledger through the state port
    pub fn load(&self) -> Result<Loaded> {
        self.state_port().load()
    }

    /// Saves the ledger through the state port
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        self.state_port().save(ledger)
    }
}
