//! TUI application state and logic

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::ui::Terminal;
use super::views;
use crate::cli::output::{Output, OutputFormat};
use crate::cli::schedule_cmd::{month_report, MonthReport};
use crate::cli::session::Session;
use crate::domain::{MonthKey, MonthWindow, StaffId, StaffMember};
use crate::export;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Confirm(ConfirmAction),
    NewStaff(String),
    Rename(StaffId, String),
}

/// Confirmation actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    RemoveStaff(StaffMember),
}

/// Application state
pub struct App {
    /// Workspace and loaded ledger
    session: Session,

    /// Displayed month, bounded by the forward planning limit
    window: MonthWindow,

    /// Snapshot of the displayed month
    report: MonthReport,

    /// Selected roster row
    row: usize,

    /// Selected day index (day of month minus one)
    day: usize,

    /// Input mode
    input_mode: InputMode,

    /// Status message to display
    status_message: Option<String>,

    /// Whether to quit
    should_quit: bool,

    /// Diagnostics sink; stays quiet while the alternate screen is up
    output: Output,
}

impl App {
    /// Create a new application showing `month`
    pub fn new(mut session: Session, month: MonthKey) -> Result<Self> {
        let output = Output::new(OutputFormat::Text, false);
        let window = MonthWindow::new(month, session.config().forward_month_limit);
        let report = month_report(&mut session, &output, month)?;

        Ok(Self {
            session,
            window,
            report,
            row: 0,
            day: 0,
            input_mode: InputMode::Normal,
            status_message: None,
            should_quit: false,
            output,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize => {}
                Event::Tick => {}
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        views::grid::draw(frame, self);
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let result = match &self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Confirm(_) => self.handle_confirm_key(key),
            InputMode::NewStaff(_) | InputMode::Rename(..) => self.handle_text_key(key),
        };

        // Failed saves and rejected moves are reported, never fatal
        if let Err(e) = result {
            self.status_message = Some(format!("{:#}", e));
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }

            // Cursor
            KeyCode::Char('j') | KeyCode::Down => self.move_row(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_row(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_day(1),
            KeyCode::Char('h') | KeyCode::Left => self.move_day(-1),
            KeyCode::Home => self.day = 0,
            KeyCode::End => self.day = self.report.days_in_month.saturating_sub(1),

            // Months
            KeyCode::Char(']') | KeyCode::PageDown => self.shift_month(1)?,
            KeyCode::Char('[') | KeyCode::PageUp => self.shift_month(-1)?,
            KeyCode::Char('t') => self.go_to_today()?,

            // Cells
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected()?,

            // Roster
            KeyCode::Char('a') => {
                self.input_mode = InputMode::NewStaff(String::new());
            }
            KeyCode::Char('r') => {
                if let Some(member) = self.selected_member() {
                    self.input_mode = InputMode::Rename(member.id.clone(), member.name.clone());
                }
            }
            KeyCode::Char('d') => {
                if let Some(member) = self.selected_member() {
                    self.input_mode =
                        InputMode::Confirm(ConfirmAction::RemoveStaff(member.clone()));
                }
            }

            KeyCode::Char('e') => self.export()?,

            KeyCode::Char('?') => {
                self.status_message = Some(
                    "arrows/hjkl:move space:toggle [ ]:prev/next month t:today a:add r:rename d:remove e:export"
                        .to_string(),
                );
            }

            _ => {}
        }

        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') => {
                let mode = std::mem::take(&mut self.input_mode);
                if let InputMode::Confirm(ConfirmAction::RemoveStaff(member)) = mode {
                    self.remove_staff(&member)?;
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.status_message = Some("Cancelled".to_string());
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_text_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => match std::mem::take(&mut self.input_mode) {
                InputMode::NewStaff(name) => self.add_staff(&name)?,
                InputMode::Rename(id, name) => self.rename_staff(&id, &name)?,
                _ => {}
            },
            KeyCode::Backspace => {
                if let InputMode::NewStaff(text) | InputMode::Rename(_, text) =
                    &mut self.input_mode
                {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let InputMode::NewStaff(text) | InputMode::Rename(_, text) =
                    &mut self.input_mode
                {
                    text.push(c);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn move_row(&mut self, delta: isize) {
        let len = self.report.rows.len();
        if len > 0 {
            self.row = (self.row as isize + delta).rem_euclid(len as isize) as usize;
        }
    }

    fn move_day(&mut self, delta: isize) {
        let len = self.report.days_in_month;
        if len > 0 {
            self.day = (self.day as isize + delta).rem_euclid(len as isize) as usize;
        }
    }

    fn shift_month(&mut self, offset: i32) -> Result<()> {
        let month = self.window.shift(offset)?;
        self.show_month(month)
    }

    fn go_to_today(&mut self) -> Result<()> {
        let today = MonthKey::current();
        let month = self.window.go_to(today, today)?;
        self.show_month(month)
    }

    fn show_month(&mut self, month: MonthKey) -> Result<()> {
        self.refresh_month(month)?;
        self.status_message = None;
        Ok(())
    }

    /// Rebuilds the snapshot and keeps the cursor inside the grid
    fn refresh_month(&mut self, month: MonthKey) -> Result<()> {
        self.report = month_report(&mut self.session, &self.output, month)?;
        self.row = self.row.min(self.report.rows.len().saturating_sub(1));
        self.day = self.day.min(self.report.days_in_month.saturating_sub(1));
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        self.refresh_month(self.window.current())
    }

    fn toggle_selected(&mut self) -> Result<()> {
        let Some(member) = self.selected_member().cloned() else {
            return Ok(());
        };
        let month = self.window.current();

        let status = self.session.ledger.toggle(month, &member.id, self.day)?;
        self.session.save(&self.output)?;
        self.refresh()?;
        self.status_message = Some(format!(
            "{} {}/{}: {}",
            member.name,
            month,
            self.day + 1,
            status.label()
        ));
        Ok(())
    }

    fn add_staff(&mut self, name: &str) -> Result<()> {
        let name = if name.trim().is_empty() {
            self.session.config().default_staff_name.clone()
        } else {
            name.to_string()
        };

        let member = self.session.ledger.add_staff(Some(&name));
        self.session.save(&self.output)?;
        self.refresh()?;
        self.row = self.report.rows.len().saturating_sub(1);
        self.status_message = Some(format!("Added: {}", member.name));
        Ok(())
    }

    fn rename_staff(&mut self, id: &StaffId, name: &str) -> Result<()> {
        if self.session.ledger.rename_staff(id, name) {
            self.session.save(&self.output)?;
            self.refresh()?;
            self.status_message = Some(format!("Renamed: {}", name));
        }
        Ok(())
    }

    fn remove_staff(&mut self, member: &StaffMember) -> Result<()> {
        if self.session.ledger.remove_staff(&member.id).is_some() {
            self.session.save(&self.output)?;
            self.refresh()?;
            self.status_message = Some(format!("Removed: {} (history kept)", member.name));
        }
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        let month = self.window.current();
        let path = self
            .session
            .workspace()
            .root()
            .join(&self.session.config().export_file_name);

        export::write_csv(&self.session.ledger.month_view(month), &path)?;
        self.status_message = Some(format!("Exported {} to {}", month, path.display()));
        Ok(())
    }

    fn selected_member(&self) -> Option<&StaffMember> {
        self.session.ledger.roster().members().get(self.row)
    }

    pub fn report(&self) -> &MonthReport {
        &self.report
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.day)
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.input_mode
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn forward_limit(&self) -> u32 {
        self.window.forward_limit()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
