//! Staff CLI commands

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use serde::Serialize;

use super::output::Output;
use super::session::{MonthArgs, Session};
use crate::domain::ShiftStatus;

#[derive(Subcommand)]
pub enum StaffCommands {
    /// List the roster in display order
    List,

    /// Add a staff member to the end of the roster
    ///
    /// Examples:
    ///   shift staff add 高橋      # Named member
    ///   shift staff add           # Uses default_staff_name from config
    Add {
        /// Display name
        name: Option<String>,
    },

    /// Rename a staff member
    Rename {
        /// Staff ID or current name
        id: String,

        /// New display name
        name: String,
    },

    /// Remove a staff member from the roster (stored history is kept)
    Remove {
        /// Staff ID or name
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show a member's stored schedule for a month, including removed members
    History {
        /// Staff ID (or name, for members still on the roster)
        id: String,

        #[command(flatten)]
        month: MonthArgs,
    },
}

pub fn run(cmd: StaffCommands, output: &Output) -> Result<()> {
    match cmd {
        StaffCommands::List => list_staff(output),
        StaffCommands::Add { name } => add_staff(output, name.as_deref()),
        StaffCommands::Rename { id, name } => rename_staff(output, &id, &name),
        StaffCommands::Remove { id, yes } => remove_staff(output, &id, yes),
        StaffCommands::History { id, month } => show_history(output, &id, &month),
    }
}

#[derive(Serialize)]
struct StaffEntry<'a> {
    position: usize,
    id: &'a str,
    name: &'a str,
}

fn list_staff(output: &Output) -> Result<()> {
    let session = Session::open(output)?;
    let roster = session.ledger.roster();

    if output.is_json() {
        let items: Vec<_> = roster
            .members()
            .iter()
            .enumerate()
            .map(|(i, member)| StaffEntry {
                position: i + 1,
                id: member.id.as_str(),
                name: &member.name,
            })
            .collect();
        output.data(&items);
    } else if roster.is_empty() {
        println!("No staff on the roster");
    } else {
        println!("{:<4} {:<16} NAME", "#", "ID");
        for (i, member) in roster.members().iter().enumerate() {
            println!("{:<4} {:<16} {}", i + 1, member.id, member.name);
        }

        let retired = session.ledger.retired_ids();
        if !retired.is_empty() {
            println!();
            println!(
                "History kept for {} removed member(s): {}",
                retired.len(),
                retired
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    Ok(())
}

fn add_staff(output: &Output, name: Option<&str>) -> Result<()> {
    let mut session = Session::open(output)?;
    let default_name = session.config().default_staff_name.clone();
    let member = session
        .ledger
        .add_staff(Some(name.unwrap_or(&default_name)));
    output.verbose_ctx("staff", &format!("Issued id {}", member.id));
    session.save(output)?;

    if output.is_json() {
        output.data(&member);
    } else {
        output.success(&format!("Added staff: {} - {}", member.id, member.name));
    }
    Ok(())
}

fn rename_staff(output: &Output, query: &str, name: &str) -> Result<()> {
    let mut session = Session::open(output)?;
    let member = session.member(query)?;

    session.ledger.rename_staff(&member.id, name);
    session.save(output)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": member.id,
            "old_name": member.name,
            "name": name,
        }));
    } else {
        output.success(&format!("Renamed {}: {} -> {}", member.id, member.name, name));
    }
    Ok(())
}

fn remove_staff(output: &Output, query: &str, yes: bool) -> Result<()> {
    let mut session = Session::open(output)?;
    let member = session.member(query)?;

    if !yes {
        let prompt = format!(
            "Remove {} ({}) from the roster? Stored history is kept but no longer shown. [y/N] ",
            member.name, member.id
        );
        if !confirm(&prompt)? {
            output.success("Cancelled; roster unchanged");
            return Ok(());
        }
    }

    session.ledger.remove_staff(&member.id);
    session.save(output)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": member,
            "history_kept": true,
        }));
    } else {
        output.success(&format!("Removed staff: {} - {}", member.id, member.name));
    }
    Ok(())
}

fn show_history(output: &Output, query: &str, args: &MonthArgs) -> Result<()> {
    let session = Session::open(output)?;
    let month = session.month(args)?;
    let id = session.staff_id(query);
    let on_roster = session.ledger.roster().contains(&id);

    let Some(days) = session.ledger.history(&month, &id) else {
        bail!("No stored schedule for '{}' in {}", id, month);
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "month": month,
            "id": id,
            "on_roster": on_roster,
            "work_days": days.work_days(),
            "days": days.as_slice(),
        }));
    } else {
        let glyphs: Vec<&str> = days.iter().map(ShiftStatus::glyph).collect();
        let state = if on_roster { "on roster" } else { "removed" };
        println!("{} {} ({})", id, month, state);
        println!("{}", glyphs.join(" "));
        println!("WORK days: {} / {}", days.work_days(), days.len());
    }
    Ok(())
}

/// Asks a yes/no question on stderr; anything but yes declines
fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{}", prompt);
    io::stderr().flush().context("Failed to flush prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
