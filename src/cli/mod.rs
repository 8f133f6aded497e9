//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Workspace setup | `init` |
//! | Schedule | Month grid and cells | `show`, `stats`, `toggle`, `set` |
//! | Staff | Roster management | `staff add`, `staff rename`, `staff remove` |
//! | History | Retained schedule data | `months`, `staff history` |
//! | Output | Sharing and editing | `export`, `tui` |
//!
//! ## Month Selection
//!
//! Month-scoped commands take `--month YYYY-MM` or `--offset N`. Both are
//! checked against the real current month, so planning stops at
//! `forward_month_limit` months ahead while past months stay reachable.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! shift --verbose toggle 田中 5
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod export_cmd;
mod output;
mod schedule_cmd;
mod session;
mod staff;
mod tui;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use session::{MonthArgs, Session};
