//! Schedule commands: show, stats, toggle, set, months

use anyhow::{Context, Result};
use ratatui::text::Span;
use serde::Serialize;

use super::output::Output;
use super::session::{MonthArgs, Session};
use crate::domain::{MonthKey, MonthView, ShiftStatus};

/// Width of the fairness bar in text output
const BAR_WIDTH: usize = 20;

/// One roster row of a month report
#[derive(Debug, Serialize)]
pub struct RowReport {
    pub id: String,
    pub name: String,
    pub days: Vec<ShiftStatus>,
    pub work_days: usize,
    pub percentage: f64,
}

/// Everything `show` and `stats` print for a month
#[derive(Debug, Serialize)]
pub struct MonthReport {
    pub month: MonthKey,
    pub days_in_month: usize,
    pub staff_count: usize,
    pub min_staff_per_day: usize,
    pub daily_count: Vec<usize>,
    /// 1-based days with fewer WORK staff than `min_staff_per_day`
    pub understaffed_days: Vec<usize>,
    pub rows: Vec<RowReport>,
}

impl MonthReport {
    pub fn build(view: &MonthView<'_>, min_staff_per_day: usize) -> Self {
        let days_in_month = view.days_in_month();
        let rows = view
            .rows()
            .map(|(member, sequence)| {
                let days = (0..days_in_month)
                    .map(|i| sequence.and_then(|s| s.get(i)).unwrap_or_default())
                    .collect();
                RowReport {
                    id: member.id.to_string(),
                    name: member.name.clone(),
                    days,
                    work_days: view.stats.total_for(&member.id).unwrap_or(0),
                    percentage: view.stats.percentage(&member.id).unwrap_or(0.0),
                }
            })
            .collect();

        Self {
            month: view.month,
            days_in_month,
            staff_count: view.roster.len(),
            min_staff_per_day,
            daily_count: view.stats.daily_count().to_vec(),
            understaffed_days: view
                .stats
                .understaffed_days(min_staff_per_day)
                .into_iter()
                .map(|day| day + 1)
                .collect(),
            rows,
        }
    }

    fn is_understaffed(&self, day: usize) -> bool {
        self.understaffed_days.contains(&day)
    }

    fn name_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| display_width(&row.name))
            .chain([display_width(DAILY_LABEL), display_width(NAME_LABEL)])
            .max()
            .unwrap_or(0)
    }
}

const NAME_LABEL: &str = "スタッフ";
const DAILY_LABEL: &str = "日計(人)";
const TOTAL_LABEL: &str = "合計";

/// Terminal columns taken by `text`
fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

pub(crate) fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Bar of `width` cells filled in proportion to `percentage`
pub(crate) fn fairness_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Materializes the month, saving if that filled in any rows
pub(crate) fn month_report(
    session: &mut Session,
    output: &Output,
    month: MonthKey,
) -> Result<MonthReport> {
    let min_staff = session.config().min_staff_per_day;
    let before = session.ledger.schedule().clone();
    let report = MonthReport::build(&session.ledger.month_view(month), min_staff);

    if session.ledger.schedule() != &before {
        output.verbose_ctx("month", &format!("Materialized {}", month));
        session.save(output)?;
    }
    Ok(report)
}

/// Renders the month grid with its coverage footer
pub fn render_grid(report: &MonthReport) -> String {
    let name_width = report.name_width();
    let mut lines = Vec::new();

    lines.push(format!(
        "{}  ({} staff, 要注意日 {}, min {}/day)",
        report.month,
        report.staff_count,
        report.understaffed_days.len(),
        report.min_staff_per_day
    ));

    let mut header = pad(NAME_LABEL, name_width);
    for day in 1..=report.days_in_month {
        header.push_str(&format!(" {:>2}", day));
    }
    header.push_str(&format!("  {}", TOTAL_LABEL));
    lines.push(header);

    for row in &report.rows {
        let mut line = pad(&row.name, name_width);
        for status in &row.days {
            line.push(' ');
            line.push_str(status.glyph());
        }
        line.push_str(&format!("  {:>4}", row.work_days));
        lines.push(line);
    }

    let mut footer = pad(DAILY_LABEL, name_width);
    for (i, count) in report.daily_count.iter().enumerate() {
        let mark = if report.is_understaffed(i + 1) { "!" } else { "" };
        footer.push_str(&format!(" {:>2}", format!("{}{}", count, mark)));
    }
    lines.push(footer);

    lines.join("\n")
}

/// Renders the summary and fairness bars
pub fn render_stats(report: &MonthReport) -> String {
    let name_width = report.name_width();
    let mut lines = vec![
        format!("Month: {} ({} days)", report.month, report.days_in_month),
        format!("Staff: {}", report.staff_count),
    ];

    let understaffed = if report.understaffed_days.is_empty() {
        "none".to_string()
    } else {
        report
            .understaffed_days
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    lines.push(format!(
        "要注意日 (fewer than {}): {} [{}]",
        report.min_staff_per_day,
        report.understaffed_days.len(),
        understaffed
    ));

    lines.push(String::new());
    lines.push("Fairness".to_string());
    for row in &report.rows {
        lines.push(format!(
            "{} {} {:>2} 日 / {} 日 ({:.0}%)",
            pad(&row.name, name_width),
            fairness_bar(row.percentage, BAR_WIDTH),
            row.work_days,
            report.days_in_month,
            row.percentage
        ));
    }

    lines.join("\n")
}

/// Prints the month grid
pub fn show(output: &Output, args: &MonthArgs) -> Result<()> {
    let mut session = Session::open(output)?;
    let month = session.month(args)?;
    output.verbose_ctx("show", &format!("Displaying {}", month));

    let report = month_report(&mut session, output, month)?;
    if output.is_json() {
        output.data(&report);
    } else {
        println!("{}", render_grid(&report));
    }
    Ok(())
}

/// Prints coverage and fairness for a month
pub fn stats(output: &Output, args: &MonthArgs) -> Result<()> {
    let mut session = Session::open(output)?;
    let month = session.month(args)?;
    output.verbose_ctx("stats", &format!("Computing statistics for {}", month));

    let report = month_report(&mut session, output, month)?;
    if output.is_json() {
        output.data(&report);
    } else {
        println!("{}", render_stats(&report));
    }
    Ok(())
}

#[derive(Serialize)]
struct CellChange<'a> {
    month: MonthKey,
    id: &'a str,
    name: &'a str,
    day: u32,
    status: ShiftStatus,
}

fn report_change(output: &Output, change: &CellChange<'_>) {
    if output.is_json() {
        output.data(change);
    } else {
        output.success(&format!(
            "{} {}/{}: {}",
            change.name,
            change.month,
            change.day,
            change.status.label()
        ));
    }
}

/// Advances one cell through WORK -> OFF -> REQUEST -> WORK
pub fn toggle(output: &Output, staff: &str, day: u32, args: &MonthArgs) -> Result<()> {
    let mut session = Session::open(output)?;
    let month = session.month(args)?;
    let member = session.member(staff)?;
    let index = day_index(day);

    let status = session
        .ledger
        .toggle(month, &member.id, index)
        .with_context(|| format!("Cannot toggle day {} of {} for {}", day, month, member.name))?;
    output.verbose_ctx("toggle", &format!("{} day {} -> {}", member.id, day, status));
    session.save(output)?;

    report_change(
        output,
        &CellChange {
            month,
            id: member.id.as_str(),
            name: &member.name,
            day,
            status,
        },
    );
    Ok(())
}

/// Sets one cell to a specific status
pub fn set(
    output: &Output,
    staff: &str,
    day: u32,
    status: ShiftStatus,
    args: &MonthArgs,
) -> Result<()> {
    let mut session = Session::open(output)?;
    let month = session.month(args)?;
    let member = session.member(staff)?;
    let index = day_index(day);

    session
        .ledger
        .set(month, &member.id, index, status)
        .with_context(|| format!("Cannot set day {} of {} for {}", day, month, member.name))?;
    output.verbose_ctx("set", &format!("{} day {} = {}", member.id, day, status));
    session.save(output)?;

    report_change(
        output,
        &CellChange {
            month,
            id: member.id.as_str(),
            name: &member.name,
            day,
            status,
        },
    );
    Ok(())
}

#[derive(Serialize)]
struct StoredMonth {
    month: MonthKey,
    entries: usize,
}

/// Lists every month held in the schedule store
pub fn months(output: &Output) -> Result<()> {
    let session = Session::open(output)?;
    let stored: Vec<StoredMonth> = session
        .ledger
        .schedule()
        .iter()
        .map(|(month, schedule)| StoredMonth {
            month: *month,
            entries: schedule.len(),
        })
        .collect();

    if output.is_json() {
        output.data(&stored);
    } else if stored.is_empty() {
        println!("No months stored yet");
    } else {
        println!("{:<10} ENTRIES", "MONTH");
        for entry in &stored {
            println!("{:<10} {}", entry.month, entry.entries);
        }
        println!();
        println!("{} month(s) stored", stored.len());
    }
    Ok(())
}

/// Converts a 1-based day of month to a sequence index
fn day_index(day: u32) -> usize {
    (day as usize).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ledger, StaffId};

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn report(ledger: &mut Ledger, month: &str) -> MonthReport {
        MonthReport::build(&ledger.month_view(key(month)), 3)
    }

    #[test]
    fn report_lists_understaffed_days_one_based() {
        let mut ledger = Ledger::seeded();
        ledger.toggle(key("2025-07"), &StaffId::from("1"), 4).unwrap();

        let report = report(&mut ledger, "2025-07");

        assert_eq!(report.days_in_month, 31);
        assert_eq!(report.staff_count, 3);
        assert_eq!(report.understaffed_days, vec![5]);
        assert_eq!(report.daily_count[4], 2);
        assert_eq!(report.rows[0].work_days, 30);
        assert_eq!(report.rows[0].days[4], ShiftStatus::Off);
    }

    #[test]
    fn grid_has_footer_and_marks() {
        let mut ledger = Ledger::seeded();
        ledger.toggle(key("2025-02"), &StaffId::from("3"), 0).unwrap();

        let grid = render_grid(&report(&mut ledger, "2025-02"));
        let lines: Vec<&str> = grid.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("要注意日 1"));
        assert!(lines[1].contains(TOTAL_LABEL));
        assert!(lines[4].starts_with("鈴木"));
        assert!(lines[4].contains("ー"));
        assert!(lines[5].starts_with(DAILY_LABEL));
        assert!(lines[5].contains("2!"));
    }

    #[test]
    fn stats_show_fairness_bars() {
        let mut ledger = Ledger::seeded();
        let text = render_stats(&report(&mut ledger, "2025-04"));

        assert!(text.contains("Staff: 3"));
        assert!(text.contains("[none]"));
        assert!(text.contains(&"█".repeat(BAR_WIDTH)));
        assert!(text.contains("30 日 / 30 日 (100%)"));
    }

    #[test]
    fn fairness_bar_is_clamped() {
        assert_eq!(fairness_bar(100.0, 4), "████");
        assert_eq!(fairness_bar(50.0, 4), "██░░");
        assert_eq!(fairness_bar(0.0, 4), "░░░░");
        assert_eq!(fairness_bar(250.0, 4), "████");
    }

    #[test]
    fn padding_accounts_for_wide_characters() {
        assert_eq!(display_width("田中"), 4);
        assert_eq!(pad("田中", 6), "田中  ");
        assert_eq!(pad("Ann", 6), "Ann   ");
    }

    #[test]
    fn day_index_is_zero_based() {
        assert_eq!(day_index(1), 0);
        assert_eq!(day_index(31), 30);
    }
}
