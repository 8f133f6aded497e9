//! Grid view: the displayed month with coverage and fairness panels

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::cli::schedule_cmd::{fairness_bar, pad, MonthReport};
use crate::cli::tui::app::{App, ConfirmAction, InputMode};
use crate::cli::tui::utils::{status_style, truncate_str};

const NAME_WIDTH: u16 = 12;
const FAIRNESS_BAR_WIDTH: usize = 24;

/// Draw the grid layout
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let report = app.report();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),                                   // Grid
            Constraint::Length(fairness_height(report.rows.len())), // Fairness
            Constraint::Length(3),                                // Status bar
        ])
        .split(area);

    draw_grid(frame, app, report, chunks[0]);
    draw_fairness(frame, report, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);
}

fn draw_grid(frame: &mut Frame, app: &App, report: &MonthReport, area: Rect) {
    let (cursor_row, cursor_day) = app.cursor();
    let understaffed = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);

    let mut header = vec![Cell::from("スタッフ")];
    header.extend((1..=report.days_in_month).map(|day| {
        let cell = Cell::from(format!("{:>2}", day));
        if report.understaffed_days.contains(&day) {
            cell.style(understaffed)
        } else {
            cell
        }
    }));
    header.push(Cell::from("合計"));

    let mut rows: Vec<Row> = report
        .rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let mut cells = vec![Cell::from(truncate_str(&row.name, 6))];
            cells.extend(row.days.iter().enumerate().map(|(d, status)| {
                let mut style = status_style(*status);
                if (r, d) == (cursor_row, cursor_day) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Cell::from(Span::styled(status.glyph(), style))
            }));
            cells.push(Cell::from(format!("{:>4}", row.work_days)));
            Row::new(cells)
        })
        .collect();

    let mut footer = vec![Cell::from("日計(人)").style(Style::default().fg(Color::Cyan))];
    footer.extend(report.daily_count.iter().enumerate().map(|(i, count)| {
        let cell = Cell::from(format!("{:>2}", count));
        if report.understaffed_days.contains(&(i + 1)) {
            cell.style(understaffed)
        } else {
            cell
        }
    }));
    rows.push(Row::new(footer).top_margin(1));

    let mut widths = vec![Constraint::Length(NAME_WIDTH)];
    widths.extend(std::iter::repeat(Constraint::Length(2)).take(report.days_in_month));
    widths.push(Constraint::Length(4));

    let title = format!(
        " {} ({}日) 要注意日 {} ",
        report.month,
        report.days_in_month,
        report.understaffed_days.len()
    );

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
        .column_spacing(1)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(table, area);
}

/// Fairness panel height: one line per row, the threshold note and borders
fn fairness_height(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3)
}

fn draw_fairness(frame: &mut Frame, report: &MonthReport, area: Rect) {
    let mut lines: Vec<Line> = report
        .rows
        .iter()
        .map(|row| {
            Line::from(format!(
                "{} {} {:>2} 日 / {} 日",
                pad(&truncate_str(&row.name, 6), 12),
                fairness_bar(row.percentage, FAIRNESS_BAR_WIDTH),
                row.work_days,
                report.days_in_month
            ))
        })
        .collect();
    lines.push(Line::from(Span::styled(
        format!("min {} staff/day", report.min_staff_per_day),
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph =
        Paragraph::new(lines).block(Block::default().title(" 出勤日数 ").borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

/// Draw the status bar
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (content, style) = match app.input_mode() {
        InputMode::Normal => {
            let msg = app.status_message().unwrap_or(
                "space:toggle [ ]:month t:today a:add r:rename d:delete e:export q:quit ?:help",
            );
            (msg.to_string(), Style::default())
        }
        InputMode::Confirm(ConfirmAction::RemoveStaff(member)) => (
            format!(
                "Remove {}? History is kept but no longer shown. [y/n]",
                member.name
            ),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::NewStaff(name) => (
            format!("New staff: {}_", name),
            Style::default().fg(Color::Green),
        ),
        InputMode::Rename(_, name) => (
            format!("Rename: {}_", name),
            Style::default().fg(Color::Green),
        ),
    };

    let status_text = format!("Shift [+{} months] {}", app.forward_limit(), content);

    let paragraph = Paragraph::new(status_text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fairness_height_fits_rows_and_borders() {
        assert_eq!(fairness_height(0), 3);
        assert_eq!(fairness_height(3), 6);
    }

    #[test]
    fn fairness_height_saturates_on_huge_rosters() {
        assert_eq!(fairness_height(usize::from(u16::MAX)), u16::MAX);
        assert_eq!(fairness_height(100_000), u16::MAX);
    }
}
