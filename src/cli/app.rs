//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::session::MonthArgs;
use super::{export_cmd, schedule_cmd, staff, tui};
use crate::domain::ShiftStatus;
use crate::storage::{Config, Workspace};

#[derive(Parser)]
#[command(name = "shift")]
#[command(author, version, about = "Local-first staff shift planning")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to default_format from the global config)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new shift workspace
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show the month grid with daily coverage
    Show {
        #[command(flatten)]
        month: MonthArgs,
    },

    /// Show understaffed days and per-staff fairness
    Stats {
        #[command(flatten)]
        month: MonthArgs,
    },

    /// Advance a cell through WORK -> OFF -> REQUEST -> WORK
    Toggle {
        /// Staff ID or name
        staff: String,

        /// Day of month (1-based)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=31))]
        day: u32,

        #[command(flatten)]
        month: MonthArgs,
    },

    /// Set a cell to a specific status
    Set {
        /// Staff ID or name
        staff: String,

        /// Day of month (1-based)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=31))]
        day: u32,

        /// Status: work, off or request
        status: ShiftStatus,

        #[command(flatten)]
        month: MonthArgs,
    },

    /// Manage the staff roster
    #[command(subcommand)]
    Staff(staff::StaffCommands),

    /// List the months held in the schedule history
    Months,

    /// Export a month as CSV
    Export {
        #[command(flatten)]
        month: MonthArgs,

        /// Output file (defaults to export_file_name in the workspace root)
        #[arg(long, short = 'O')]
        output: Option<PathBuf>,
    },

    /// Open the interactive month grid
    Tui {
        #[command(flatten)]
        month: MonthArgs,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = match cli.format {
        Some(format) => format,
        None => default_format(),
    };
    let output = Output::new(format, cli.verbose);

    output.verbose("Shift ledger starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing workspace at: {}", path.display()));
            let workspace = Workspace::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .shift directory at: {}", workspace.shift_dir().display()),
            );
            output.success(&format!(
                "Initialized shift workspace at {}",
                workspace.root().display()
            ));
        }

        Commands::Show { month } => schedule_cmd::show(&output, &month)?,
        Commands::Stats { month } => schedule_cmd::stats(&output, &month)?,
        Commands::Toggle { staff, day, month } => {
            schedule_cmd::toggle(&output, &staff, day, &month)?
        }
        Commands::Set {
            staff,
            day,
            status,
            month,
        } => schedule_cmd::set(&output, &staff, day, status, &month)?,

        Commands::Staff(cmd) => staff::run(cmd, &output)?,
        Commands::Months => schedule_cmd::months(&output)?,

        Commands::Export {
            month,
            output: path,
        } => export_cmd::run(&output, &month, path.as_deref())?,

        Commands::Tui { month } => tui::run(&output, &month)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Output format from the global config, or text if it cannot be read
fn default_format() -> OutputFormat {
    match Config::load_global() {
        Ok(global) => global.default_format.into(),
        Err(e) => {
            eprintln!("note: ignoring global config: {:#}", e);
            OutputFormat::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_offset() {
        let cli = Cli::try_parse_from(["shift", "show", "--offset", "-1"]).unwrap();
        match cli.command {
            Commands::Show { month } => assert_eq!(month.offset, Some(-1)),
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn month_and_offset_conflict() {
        let result = Cli::try_parse_from(["shift", "show", "--month", "2025-01", "--offset", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn set_parses_status() {
        let cli = Cli::try_parse_from(["shift", "set", "田中", "3", "request"]).unwrap();
        match cli.command {
            Commands::Set { status, day, .. } => {
                assert_eq!(status, ShiftStatus::Request);
                assert_eq!(day, 3);
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn day_zero_is_rejected() {
        assert!(Cli::try_parse_from(["shift", "toggle", "1", "0"]).is_err());
    }
}
