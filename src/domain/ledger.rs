//! The shift ledger: roster plus schedule store
//!
//! This is the single owner of mutable shift state. Every mutation goes
//! through `&mut self`, so callers that share a ledger across threads must
//! wrap it in a single lock. Persistence is not its concern; the caller
//! loads a ledger at startup and saves it after each successful mutation.

use super::coverage::CoverageStats;
use super::month::MonthKey;
use super::schedule::{DaySequence, MonthlySchedule, ScheduleError, ScheduleStore};
use super::staff::{Roster, StaffId, StaffMember};
use super::status::ShiftStatus;

/// A materialized month ready for display
#[derive(Debug)]
pub struct MonthView<'a> {
    pub month: MonthKey,
    pub roster: &'a Roster,
    pub schedule: &'a MonthlySchedule,
    pub stats: CoverageStats,
}

impl MonthView<'_> {
    pub fn days_in_month(&self) -> usize {
        self.month.days_in_month()
    }

    /// Roster members paired with their sequences, in display order
    pub fn rows(&self) -> impl Iterator<Item = (&StaffMember, Option<&DaySequence>)> {
        self.roster
            .into_iter()
            .map(move |member| (member, self.schedule.get(&member.id)))
    }
}

/// Roster and schedule history of one tenant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    roster: Roster,
    schedule: ScheduleStore,
}

impl Ledger {
    pub fn new(mut roster: Roster, schedule: ScheduleStore) -> Self {
        // Ids that only survive in history must never be reissued.
        roster.reserve_ids(schedule.staff_ids());
        Self { roster, schedule }
    }

    /// First-run state: seed roster, no months
    pub fn seeded() -> Self {
        Self::new(Roster::seed(), ScheduleStore::new())
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn schedule(&self) -> &ScheduleStore {
        &self.schedule
    }

    /// Materializes the month for the current roster and derives its statistics
    pub fn month_view(&mut self, month: MonthKey) -> MonthView<'_> {
        let schedule = self.schedule.get_month(month, &self.roster);
        let stats = CoverageStats::compute(schedule, &self.roster, month.days_in_month());
        MonthView {
            month,
            roster: &self.roster,
            schedule,
            stats,
        }
    }

    /// Advances a roster member's cell through the status cycle
    pub fn toggle(
        &mut self,
        month: MonthKey,
        staff: &StaffId,
        index: usize,
    ) -> Result<ShiftStatus, ScheduleError> {
        self.ensure_on_roster(month, staff)?;
        self.schedule.get_month(month, &self.roster);
        self.schedule.toggle_status(month, staff, index)
    }

    /// Sets a roster member's cell to a specific status
    pub fn set(
        &mut self,
        month: MonthKey,
        staff: &StaffId,
        index: usize,
        status: ShiftStatus,
    ) -> Result<(), ScheduleError> {
        self.ensure_on_roster(month, staff)?;
        self.schedule.get_month(month, &self.roster);
        self.schedule.set_status(month, staff, index, status)
    }

    pub fn add_staff(&mut self, name: Option<&str>) -> StaffMember {
        self.roster.add_staff(name)
    }

    pub fn rename_staff(&mut self, id: &StaffId, name: impl Into<String>) -> bool {
        self.roster.rename_staff(id, name)
    }

    /// Takes a member off the roster; their history stays in the store
    pub fn remove_staff(&mut self, id: &StaffId) -> Option<StaffMember> {
        self.roster.remove_staff(id)
    }

    /// Any member's stored sequence, including members no longer on the roster
    pub fn history(&self, month: &MonthKey, id: &StaffId) -> Option<&DaySequence> {
        self.schedule.sequence(month, id)
    }

    /// Ids with stored history that are no longer on the roster
    pub fn retired_ids(&self) -> Vec<StaffId> {
        let mut ids: Vec<StaffId> = self
            .schedule
            .staff_ids()
            .filter(|id| !self.roster.contains(id))
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn ensure_on_roster(&self, month: MonthKey, staff: &StaffId) -> Result<(), ScheduleError> {
        if self.roster.contains(staff) {
            Ok(())
        } else {
            Err(ScheduleError::UnknownStaff {
                month,
                staff: staff.clone(),
            })
        }
    }

    #[cfg(test)]
    pub(crate) fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }
}
