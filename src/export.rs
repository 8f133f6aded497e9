//! CSV export of a month
//!
//! One header row (`スタッフ名,1日,...,N日`) followed by one row per roster
//! member in display order, with each cell written as its status label.
//! Members that have no stored sequence are written as all WORK.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{MonthView, ShiftStatus};

/// First header cell
pub const NAME_COLUMN: &str = "スタッフ名";

/// Renders the month as CSV text
pub fn render_csv(view: &MonthView<'_>) -> String {
    let days = view.days_in_month();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(view.roster.len() + 1);

    let mut header = Vec::with_capacity(days + 1);
    header.push(NAME_COLUMN.to_string());
    header.extend((1..=days).map(|day| format!("{}日", day)));
    rows.push(header);

    for (member, sequence) in view.rows() {
        let mut row = Vec::with_capacity(days + 1);
        row.push(member.name.clone());
        row.extend((0..days).map(|index| {
            sequence
                .and_then(|seq| seq.get(index))
                .unwrap_or(ShiftStatus::Work)
                .label()
                .to_string()
        }));
        rows.push(row);
    }

    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|value| escape_csv(value))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Writes the month to `path` as UTF-8 CSV
pub fn write_csv(view: &MonthView<'_>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, render_csv(view))
        .with_context(|| format!("Failed to write export: {}", path.display()))
}

fn escape_csv(value: &str) -> String {
    let needs_quotes = value.contains(',')
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ledger, MonthKey, StaffId};
    use tempfile::TempDir;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn header_and_rows_follow_roster() {
        let mut ledger = Ledger::seeded();
        ledger.toggle(key("2025-02"), &StaffId::from("2"), 0).unwrap();
        ledger.toggle(key("2025-02"), &StaffId::from("2"), 1).unwrap();
        ledger.toggle(key("2025-02"), &StaffId::from("2"), 1).unwrap();

        let csv = render_csv(&ledger.month_view(key("2025-02")));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("スタッフ名,1日,2日,"));
        assert!(lines[0].ends_with(",28日"));
        assert_eq!(lines[0].split(',').count(), 29);
        assert!(lines[1].starts_with("田中,出勤,出勤,"));
        assert!(lines[2].starts_with("佐藤,休み,希望休,出勤,"));
        assert!(lines[3].starts_with("鈴木,"));
    }

    #[test]
    fn removed_staff_are_not_exported() {
        let mut ledger = Ledger::seeded();
        ledger.month_view(key("2025-03"));
        ledger.remove_staff(&StaffId::from("1"));

        let csv = render_csv(&ledger.month_view(key("2025-03")));

        assert!(!csv.contains("田中"));
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let mut ledger = Ledger::seeded();
        ledger.rename_staff(&StaffId::from("1"), "Tanaka, \"Ken\"");

        let csv = render_csv(&ledger.month_view(key("2025-04")));
        let second = csv.lines().nth(1).unwrap();

        assert!(second.starts_with("\"Tanaka, \"\"Ken\"\"\",出勤"));
    }

    #[test]
    fn write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("shift_schedule.csv");
        let mut ledger = Ledger::seeded();

        write_csv(&ledger.month_view(key("2024-02")), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.lines().next().unwrap().ends_with(",29日"));
    }
}
