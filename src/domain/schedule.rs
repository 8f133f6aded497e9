//! Month-keyed schedule store
//!
//! The store maps each visited month to a [`MonthlySchedule`], which maps
//! staff ids to one [`DaySequence`] per member. Months and day sequences are
//! held behind [`Arc`], so cloning the store is cheap and a single-cell edit
//! copies only the touched month's id table and the one touched sequence.
//! Snapshots taken before an edit never observe it.
//!
//! Months are materialized lazily: [`ScheduleStore::get_month`] fills in an
//! all-WORK sequence for every roster member the month does not know yet.
//! Sequences of members who left the roster are kept.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::month::MonthKey;
use super::staff::{Roster, StaffId};
use super::status::ShiftStatus;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("No schedule for staff '{staff}' in {month}")]
    UnknownStaff { month: MonthKey, staff: StaffId },

    #[error("Day index {index} out of range for {month} ({days} days)")]
    DayOutOfRange {
        month: MonthKey,
        index: usize,
        days: usize,
    },
}

/// One member's statuses for one month, indexed by day-of-month minus one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySequence(Vec<ShiftStatus>);

impl DaySequence {
    /// A fully staffed sequence of the given length
    pub fn all_work(days: usize) -> Self {
        Self(vec![ShiftStatus::Work; days])
    }

    pub fn from_statuses(statuses: Vec<ShiftStatus>) -> Self {
        Self(statuses)
    }

    pub fn get(&self, index: usize) -> Option<ShiftStatus> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ShiftStatus> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ShiftStatus] {
        &self.0
    }

    /// Number of WORK days
    pub fn work_days(&self) -> usize {
        self.0.iter().filter(|s| s.is_work()).count()
    }

    /// Truncates or pads (with WORK) to exactly `days` entries
    ///
    /// Returns true if the length changed.
    pub fn fit_to(&mut self, days: usize) -> bool {
        if self.0.len() == days {
            return false;
        }
        self.0.resize(days, ShiftStatus::Work);
        true
    }

    fn set(&mut self, index: usize, status: ShiftStatus) {
        self.0[index] = status;
    }
}

/// Day sequences of every known member for one month
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySchedule {
    entries: BTreeMap<StaffId, Arc<DaySequence>>,
}

impl MonthlySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, staff: &StaffId) -> Option<&DaySequence> {
        self.entries.get(staff).map(Arc::as_ref)
    }

    pub fn contains(&self, staff: &StaffId) -> bool {
        self.entries.contains_key(staff)
    }

    pub fn insert(&mut self, staff: StaffId, days: DaySequence) {
        self.entries.insert(staff, Arc::new(days));
    }

    /// Iterates over every stored sequence, including non-roster members
    pub fn iter(&self) -> impl Iterator<Item = (&StaffId, &DaySequence)> {
        self.entries.iter().map(|(id, days)| (id, days.as_ref()))
    }

    pub fn staff_ids(&self) -> impl Iterator<Item = &StaffId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All visited months
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleStore {
    months: BTreeMap<MonthKey, Arc<MonthlySchedule>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already materialized months
    pub fn from_months(months: impl IntoIterator<Item = (MonthKey, MonthlySchedule)>) -> Self {
        Self {
            months: months
                .into_iter()
                .map(|(key, schedule)| (key, Arc::new(schedule)))
                .collect(),
        }
    }

    /// Returns the month's schedule, creating entries for roster members it lacks
    ///
    /// Missing members get an all-WORK sequence sized to the month. Calling
    /// this again with the same roster changes nothing.
    pub fn get_month(&mut self, month: MonthKey, roster: &Roster) -> &MonthlySchedule {
        let days = month.days_in_month();
        let schedule = self.months.entry(month).or_default();

        if roster.ids().any(|id| !schedule.contains(id)) {
            let filled = Arc::make_mut(schedule);
            for id in roster.ids() {
                if !filled.contains(id) {
                    filled.insert(id.clone(), DaySequence::all_work(days));
                }
            }
        }

        &**schedule
    }

    /// Returns the month's schedule without materializing anything
    pub fn month(&self, month: &MonthKey) -> Option<&MonthlySchedule> {
        self.months.get(month).map(Arc::as_ref)
    }

    /// Looks up any member's sequence, whether or not they are on the roster
    pub fn sequence(&self, month: &MonthKey, staff: &StaffId) -> Option<&DaySequence> {
        self.month(month)?.get(staff)
    }

    /// Reads one cell
    pub fn status(
        &self,
        month: MonthKey,
        staff: &StaffId,
        index: usize,
    ) -> Result<ShiftStatus, ScheduleError> {
        let days = self.sequence(&month, staff).ok_or_else(|| ScheduleError::UnknownStaff {
            month,
            staff: staff.clone(),
        })?;
        days.get(index).ok_or(ScheduleError::DayOutOfRange {
            month,
            index,
            days: days.len(),
        })
    }

    /// Replaces exactly one cell
    ///
    /// The member must already have a sequence for the month (see
    /// [`get_month`](Self::get_month)). Nothing else in the store changes.
    pub fn set_status(
        &mut self,
        month: MonthKey,
        staff: &StaffId,
        index: usize,
        status: ShiftStatus,
    ) -> Result<(), ScheduleError> {
        // Validate first: a rejected edit must not copy anything.
        self.status(month, staff, index)?;

        let days = self
            .months
            .get_mut(&month)
            .and_then(|schedule| Arc::make_mut(schedule).entries.get_mut(staff))
            .ok_or_else(|| ScheduleError::UnknownStaff {
                month,
                staff: staff.clone(),
            })?;
        Arc::make_mut(days).set(index, status);
        Ok(())
    }

    /// Returns an updated copy with one cell replaced, leaving `self` intact
    pub fn with_status(
        &self,
        month: MonthKey,
        staff: &StaffId,
        index: usize,
        status: ShiftStatus,
    ) -> Result<Self, ScheduleError> {
        let mut next = self.clone();
        next.set_status(month, staff, index, status)?;
        Ok(next)
    }

    /// Advances one cell through the status cycle, returning its new status
    pub fn toggle_status(
        &mut self,
        month: MonthKey,
        staff: &StaffId,
        index: usize,
    ) -> Result<ShiftStatus, ScheduleError> {
        let next = self.status(month, staff, index)?.next();
        self.set_status(month, staff, index, next)?;
        Ok(next)
    }

    /// Visited months in chronological order
    pub fn months(&self) -> impl Iterator<Item = &MonthKey> {
        self.months.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MonthKey, &MonthlySchedule)> {
        self.months.iter().map(|(key, schedule)| (key, schedule.as_ref()))
    }

    /// Every staff id with history in any month
    pub fn staff_ids(&self) -> impl Iterator<Item = &StaffId> {
        self.months.values().flat_map(|schedule| schedule.staff_ids())
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}
