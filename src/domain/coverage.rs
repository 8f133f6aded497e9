//! Coverage and fairness statistics
//!
//! Derived from one month's schedule and the current roster, recomputed from
//! scratch whenever either changes. Only WORK counts toward coverage.

use serde::Serialize;

use super::schedule::MonthlySchedule;
use super::staff::{Roster, StaffId};

/// Default minimum headcount before a day is flagged as understaffed
pub const DEFAULT_MIN_STAFF_PER_DAY: usize = 3;

/// WORK-day total of one roster member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffTotal {
    pub staff: StaffId,
    pub work_days: usize,
}

/// Daily headcount and per-member totals for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageStats {
    days_in_month: usize,
    daily_count: Vec<usize>,
    staff_totals: Vec<StaffTotal>,
}

impl CoverageStats {
    /// Aggregates WORK counts for every roster member, in roster order
    ///
    /// Members without a sequence count as zero; stored sequences of members
    /// no longer on the roster are ignored.
    pub fn compute(schedule: &MonthlySchedule, roster: &Roster, days_in_month: usize) -> Self {
        let mut daily_count = vec![0; days_in_month];
        let mut staff_totals = Vec::with_capacity(roster.len());

        for member in roster {
            let mut work_days = 0;
            if let Some(days) = schedule.get(&member.id) {
                for (day, status) in days.iter().take(days_in_month).enumerate() {
                    if status.is_work() {
                        daily_count[day] += 1;
                        work_days += 1;
                    }
                }
            }
            staff_totals.push(StaffTotal {
                staff: member.id.clone(),
                work_days,
            });
        }

        Self {
            days_in_month,
            daily_count,
            staff_totals,
        }
    }

    pub fn days_in_month(&self) -> usize {
        self.days_in_month
    }

    /// Number of members working on each day (index = day-of-month minus one)
    pub fn daily_count(&self) -> &[usize] {
        &self.daily_count
    }

    pub fn staff_totals(&self) -> &[StaffTotal] {
        &self.staff_totals
    }

    /// WORK days of one member, if they are on the roster
    pub fn total_for(&self, staff: &StaffId) -> Option<usize> {
        self.staff_totals
            .iter()
            .find(|t| &t.staff == staff)
            .map(|t| t.work_days)
    }

    /// Share of the month a member works, in percent
    pub fn percentage(&self, staff: &StaffId) -> Option<f64> {
        let total = self.total_for(staff)?;
        if self.days_in_month == 0 {
            return Some(0.0);
        }
        Some(100.0 * total as f64 / self.days_in_month as f64)
    }

    /// True if fewer than `min_staff` members work on the day
    pub fn is_understaffed(&self, day: usize, min_staff: usize) -> bool {
        self.daily_count
            .get(day)
            .is_some_and(|&count| count < min_staff)
    }

    /// Zero-based indices of understaffed days
    pub fn understaffed_days(&self, min_staff: usize) -> Vec<usize> {
        (0..self.daily_count.len())
            .filter(|&day| self.is_understaffed(day, min_staff))
            .collect()
    }
}
