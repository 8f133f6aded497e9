//! Per-day attendance status
//!
//! A cell in the schedule holds one of three statuses. Toggling a cell walks
//! the fixed cycle `WORK -> OFF -> REQUEST -> WORK`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid status: expected 'work', 'off' or 'request', got '{0}'")]
pub struct StatusParseError(String);

/// Attendance status of one staff member on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    /// Scheduled to work (the default for a freshly visited month)
    #[default]
    Work,
    /// Day off assigned by the planner
    Off,
    /// Day off requested by the staff member
    Request,
}

impl ShiftStatus {
    /// All statuses in cycle order
    pub const ALL: [ShiftStatus; 3] = [ShiftStatus::Work, ShiftStatus::Off, ShiftStatus::Request];

    /// Returns the successor in the toggle cycle
    pub fn next(self) -> Self {
        match self {
            ShiftStatus::Work => ShiftStatus::Off,
            ShiftStatus::Off => ShiftStatus::Request,
            ShiftStatus::Request => ShiftStatus::Work,
        }
    }

    /// Returns true if this status counts toward coverage
    pub fn is_work(self) -> bool {
        matches!(self, ShiftStatus::Work)
    }

    /// Persisted status code
    pub fn as_code(self) -> &'static str {
        match self {
            ShiftStatus::Work => "WORK",
            ShiftStatus::Off => "OFF",
            ShiftStatus::Request => "REQUEST",
        }
    }

    /// Localized label used in reports
    pub fn label(self) -> &'static str {
        match self {
            ShiftStatus::Work => "出勤",
            ShiftStatus::Off => "休み",
            ShiftStatus::Request => "希望休",
        }
    }

    /// Single-glyph marker used in grids
    pub fn glyph(self) -> &'static str {
        match self {
            ShiftStatus::Work => "出",
            ShiftStatus::Off => "ー",
            ShiftStatus::Request => "希",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for ShiftStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "w" => Ok(ShiftStatus::Work),
            "off" | "o" => Ok(ShiftStatus::Off),
            "request" | "r" => Ok(ShiftStatus::Request),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}
