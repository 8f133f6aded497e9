//! Shift Ledger - local-first staff shift planning
//!
//! Tracks a per-day attendance status (WORK, OFF, REQUEST) for each staff
//! member across calendar months, and derives daily coverage and per-member
//! fairness from that state.

pub mod domain;
pub mod storage;
pub mod export;
pub mod cli;

pub use domain::{
    CoverageStats, Ledger, MonthKey, MonthWindow, Roster, ScheduleStore, ShiftStatus, StaffId,
    StaffMember,
};
