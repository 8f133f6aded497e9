//! Interactive month grid
//!
//! Shows the displayed month as a grid of statuses with the daily coverage
//! row and fairness bars, and edits the ledger in place. Every change is
//! saved before the next key is read.

mod app;
mod event;
mod ui;
mod utils;
mod views;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::output::Output;
use super::session::{MonthArgs, Session};
use app::App;
use event::EventHandler;

/// Launch the TUI on the selected month
pub fn run(output: &Output, args: &MonthArgs) -> Result<()> {
    output.verbose_ctx("tui", "Initializing TUI application");

    // Load before touching the terminal so notices stay readable
    let session = Session::open(output)?;
    let month = session.month(args)?;
    let mut app = App::new(session, month)?;

    let mut terminal = ui::init_terminal()?;
    let event_handler = EventHandler::new(250);

    // Run the main loop with panic safety
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        app.run(&mut terminal, event_handler)
    }));

    // Always restore terminal, even on panic
    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}
