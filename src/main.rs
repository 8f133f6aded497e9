//! Shift Ledger - local-first staff shift planning

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = shift_ledger::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
