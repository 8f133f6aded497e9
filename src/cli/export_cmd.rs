//! CSV export command

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::output::Output;
use super::session::{MonthArgs, Session};
use crate::export;

/// Writes the selected month as CSV
///
/// Without `--output` the file lands in the workspace root under the
/// configured `export_file_name`.
pub fn run(output: &Output, args: &MonthArgs, path: Option<&Path>) -> Result<()> {
    let mut session = Session::open(output)?;
    let month = session.month(args)?;

    let target: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => session
            .workspace()
            .root()
            .join(&session.config().export_file_name),
    };
    output.verbose_ctx(
        "export",
        &format!("Exporting {} to {}", month, target.display()),
    );

    let before = session.ledger.schedule().clone();
    let view = session.ledger.month_view(month);
    let rows = view.roster.len();
    export::write_csv(&view, &target)?;

    if session.ledger.schedule() != &before {
        session.save(output)?;
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "month": month,
            "path": target.display().to_string(),
            "rows": rows,
        }));
    } else {
        output.success(&format!(
            "Exported {} ({} staff) to {}",
            month,
            rows,
            target.display()
        ));
    }
    Ok(())
}
