//! Displayed-month navigation
//!
//! Moving backward is always allowed since history is retained. Moving
//! forward stops at `forward_limit` months after the real-world current
//! month, evaluated at the time of the move.

use thiserror::Error;

use super::month::{MonthError, MonthKey};

/// Default number of months a user may plan ahead
pub const DEFAULT_FORWARD_MONTH_LIMIT: u32 = 2;

#[derive(Debug, Error, PartialEq)]
pub enum NavigationError {
    #[error("Shifts can only be planned up to {limit} month(s) ahead (latest: {latest}, requested: {requested})")]
    BeyondForwardLimit {
        requested: MonthKey,
        latest: MonthKey,
        limit: u32,
    },

    #[error(transparent)]
    OutOfRange(#[from] MonthError),
}

/// Tracks the displayed month and enforces the forward planning bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    current: MonthKey,
    forward_limit: u32,
}

impl MonthWindow {
    pub fn new(current: MonthKey, forward_limit: u32) -> Self {
        Self {
            current,
            forward_limit,
        }
    }

    /// Starts at the real-world current month
    pub fn starting_now(forward_limit: u32) -> Self {
        Self::new(MonthKey::current(), forward_limit)
    }

    pub fn current(&self) -> MonthKey {
        self.current
    }

    pub fn forward_limit(&self) -> u32 {
        self.forward_limit
    }

    /// Latest month reachable when the real-world month is `today`
    ///
    /// Limits reaching past the calendar clamp to [`MonthKey::LAST`].
    pub fn latest_allowed(&self, today: MonthKey) -> MonthKey {
        let limit = i32::try_from(self.forward_limit).unwrap_or(i32::MAX);
        today.offset(limit).unwrap_or(MonthKey::LAST)
    }

    /// Moves by `offset` months against the real-world current month
    pub fn shift(&mut self, offset: i32) -> Result<MonthKey, NavigationError> {
        self.shift_from(offset, MonthKey::current())
    }

    /// Moves by `offset` months, with `today` as the real-world month
    ///
    /// A rejected move leaves the window unchanged.
    pub fn shift_from(&mut self, offset: i32, today: MonthKey) -> Result<MonthKey, NavigationError> {
        let requested = self.current.offset(offset)?;

        if offset > 0 {
            let latest = self.latest_allowed(today);
            if requested > latest {
                return Err(NavigationError::BeyondForwardLimit {
                    requested,
                    latest,
                    limit: self.forward_limit,
                });
            }
        }

        self.current = requested;
        Ok(requested)
    }

    /// Jumps to a specific month, applying the same rules as [`shift_from`](Self::shift_from)
    pub fn go_to(&mut self, target: MonthKey, today: MonthKey) -> Result<MonthKey, NavigationError> {
        let offset = self.current.months_until(&target);
        let offset = i32::try_from(offset).map_err(|_| MonthError::YearOutOfRange(target.year()))?;
        self.shift_from(offset, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn forward_within_limit() {
        let today = key("2025-11");
        let mut window = MonthWindow::new(today, 2);

        assert_eq!(window.shift_from(1, today).unwrap(), key("2025-12"));
        assert_eq!(window.shift_from(1, today).unwrap(), key("2026-01"));
        assert_eq!(window.current(), key("2026-01"));
    }

    #[test]
    fn forward_beyond_limit_is_rejected() {
        let today = key("2025-11");
        let mut window = MonthWindow::new(today, 2);

        let err = window.shift_from(3, today).unwrap_err();
        assert_eq!(
            err,
            NavigationError::BeyondForwardLimit {
                requested: key("2026-02"),
                latest: key("2026-01"),
                limit: 2
            }
        );
        assert_eq!(window.current(), today);
    }

    #[test]
    fn stepping_past_limit_is_rejected() {
        let today = key("2025-06");
        let mut window = MonthWindow::new(today, 2);
        window.shift_from(2, today).unwrap();

        assert!(window.shift_from(1, today).is_err());
        assert_eq!(window.current(), key("2025-08"));
    }

    #[test]
    fn backward_is_unbounded() {
        let today = key("2025-06");
        let mut window = MonthWindow::new(today, 2);

        assert_eq!(window.shift_from(-30, today).unwrap(), key("2022-12"));
        assert_eq!(window.shift_from(-1, today).unwrap(), key("2022-11"));
    }

    #[test]
    fn backward_allowed_even_when_already_past_limit() {
        // Window opened while the real month was later than "today" is now
        let mut window = MonthWindow::new(key("2026-05"), 2);
        let today = key("2025-06");

        assert_eq!(window.shift_from(-1, today).unwrap(), key("2026-04"));
        assert!(window.shift_from(1, today).is_err());
    }

    #[test]
    fn zero_limit_forbids_future() {
        let today = key("2025-06");
        let mut window = MonthWindow::new(today, 0);

        assert!(window.shift_from(1, today).is_err());
        assert_eq!(window.shift_from(0, today).unwrap(), today);
    }

    #[test]
    fn go_to_uses_same_rules() {
        let today = key("2025-06");
        let mut window = MonthWindow::new(today, 2);

        assert_eq!(window.go_to(key("2024-01"), today).unwrap(), key("2024-01"));
        assert_eq!(window.go_to(key("2025-08"), today).unwrap(), key("2025-08"));
        assert!(window.go_to(key("2025-09"), today).is_err());
        assert_eq!(window.current(), key("2025-08"));
    }

    #[test]
    fn huge_limit_clamps_to_last_month() {
        let today = key("2026-10");
        let mut window = MonthWindow::new(today, 200_000);

        assert_eq!(window.latest_allowed(today), MonthKey::LAST);
        assert_eq!(window.shift_from(1, today).unwrap(), key("2026-11"));
        assert_eq!(window.go_to(key("9999-12"), today).unwrap(), key("9999-12"));
        assert!(matches!(
            window.shift_from(1, today),
            Err(NavigationError::OutOfRange(_))
        ));
    }

    #[test]
    fn max_limit_allows_forward_moves() {
        let today = key("2026-10");
        let mut window = MonthWindow::new(today, u32::MAX);

        assert_eq!(window.shift_from(1, today).unwrap(), key("2026-11"));
    }

    #[test]
    fn shift_out_of_calendar_range() {
        let mut window = MonthWindow::new(key("0001-01"), 2);
        let err = window.shift_from(-1, key("0001-01")).unwrap_err();
        assert!(matches!(err, NavigationError::OutOfRange(_)));
    }
}
