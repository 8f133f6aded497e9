//! # Storage Layer
//!
//! Persistence for the shift ledger, kept in plain files next to the user's
//! work.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Roster | Versioned JSON | `.shift/roster.json` |
//! | Schedule history | Versioned JSON | `.shift/schedule.json` |
//! | Config | TOML | `.shift/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`FileStatePort`] takes `fs2` locks while reading and writing
//! - All writes are atomic (temp file + rename)
//! - A damaged record is copied to `*.corrupt` and replaced by its default
//!
//! ## Workspace Structure
//!
//! ```text
//! .shift/
//! ├── roster.json      # Staff in display order
//! ├── schedule.json    # Every stored month, including removed staff
//! ├── config.toml      # Workspace configuration
//! └── .gitignore       # Ignores temp files and corrupt backups
//! ```
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for accessing a shift workspace
//! - [`StatePort`] - Load/save seam with file and in-memory adapters
//! - [`Config`] - Workspace and global configuration

mod config;
mod records;
mod state;
mod workspace;

pub use config::{
    Config, ConfigError, GlobalConfig, OutputFormat, WorkspaceConfig, DEFAULT_EXPORT_FILE_NAME,
};
pub use records::{
    deserialize_roster, deserialize_schedule, serialize_roster, serialize_schedule, Decoded,
    RecordError, ROSTER_VERSION, SCHEDULE_VERSION,
};
pub use state::{FileStatePort, Loaded, MemoryStatePort, StatePort, ROSTER_FILE, SCHEDULE_FILE};
pub use workspace::{Workspace, WorkspaceError};
