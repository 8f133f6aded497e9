//! Domain models for the shift ledger
//!
//! Contains the shift state model and its derived analytics, without any
//! I/O concerns.

mod status;
mod month;
mod staff;
mod schedule;
mod coverage;
mod window;
mod ledger;

pub use status::{ShiftStatus, StatusParseError};
pub use month::{MonthError, MonthKey};
pub use staff::{Roster, StaffId, StaffMember, DEFAULT_STAFF_NAME};
pub use schedule::{DaySequence, MonthlySchedule, ScheduleError, ScheduleStore};
pub use coverage::{CoverageStats, StaffTotal, DEFAULT_MIN_STAFF_PER_DAY};
pub use window::{MonthWindow, NavigationError, DEFAULT_FORWARD_MONTH_LIMIT};
pub use ledger::{Ledger, MonthView};
