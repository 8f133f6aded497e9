//! Persisted record formats
//!
//! Two independently versioned JSON records:
//!
//! Roster: `{"version": 1, "staff": [{"id": "1", "name": "田中"}, ...]}`
//! Schedule: `{"version": 1, "months": {"2025-07": {"1": ["WORK", "OFF", ...]}}}`
//!
//! The un-enveloped forms (a bare staff array, a bare month map) are also
//! accepted on read and are upgraded on the next write.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    DaySequence, MonthKey, MonthlySchedule, Roster, ScheduleStore, ShiftStatus, StaffId,
    StaffMember,
};

/// Current roster record version
pub const ROSTER_VERSION: u32 = 1;

/// Current schedule record version
pub const SCHEDULE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed {record} record: {source}")]
    Malformed {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported {record} record version {found} (this build reads up to {supported})")]
    UnsupportedVersion {
        record: &'static str,
        found: u32,
        supported: u32,
    },
}

/// A decoded record plus notes about anything repaired along the way
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    pub notices: Vec<String>,
}

#[derive(Serialize)]
struct RosterOut<'a> {
    version: u32,
    staff: &'a [StaffMember],
}

#[derive(Deserialize)]
struct RosterIn {
    version: u32,
    staff: Vec<StaffMember>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterRepr {
    Versioned(RosterIn),
    Bare(Vec<StaffMember>),
}

type MonthMap = BTreeMap<String, BTreeMap<StaffId, Vec<ShiftStatus>>>;

#[derive(Serialize)]
struct ScheduleOut<'a> {
    version: u32,
    months: BTreeMap<MonthKey, BTreeMap<&'a StaffId, &'a [ShiftStatus]>>,
}

#[derive(Deserialize)]
struct ScheduleIn {
    version: u32,
    months: MonthMap,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScheduleRepr {
    Versioned(ScheduleIn),
    Bare(MonthMap),
}

/// Writes the roster record
pub fn serialize_roster(roster: &Roster) -> Result<String, RecordError> {
    serde_json::to_string_pretty(&RosterOut {
        version: ROSTER_VERSION,
        staff: roster.members(),
    })
    .map_err(|source| RecordError::Malformed {
        record: "roster",
        source,
    })
}

/// Reads the roster record, dropping repeated ids
pub fn deserialize_roster(text: &str) -> Result<Decoded<Roster>, RecordError> {
    let repr: RosterRepr = serde_json::from_str(text).map_err(|source| RecordError::Malformed {
        record: "roster",
        source,
    })?;

    let staff = match repr {
        RosterRepr::Versioned(record) => {
            check_version("roster", record.version, ROSTER_VERSION)?;
            record.staff
        }
        RosterRepr::Bare(staff) => staff,
    };

    let mut notices = Vec::new();
    let mut seen = HashSet::new();
    let mut members = Vec::with_capacity(staff.len());
    for member in staff {
        if seen.insert(member.id.clone()) {
            members.push(member);
        } else {
            notices.push(format!("Dropped duplicate staff id '{}'", member.id));
        }
    }

    Ok(Decoded {
        value: Roster::new(members),
        notices,
    })
}

/// Writes the schedule record
pub fn serialize_schedule(store: &ScheduleStore) -> Result<String, RecordError> {
    let months: BTreeMap<MonthKey, BTreeMap<&StaffId, &[ShiftStatus]>> = store
        .iter()
        .map(|(key, schedule)| {
            let entries = schedule
                .iter()
                .map(|(id, days)| (id, days.as_slice()))
                .collect();
            (*key, entries)
        })
        .collect();

    serde_json::to_string_pretty(&ScheduleOut {
        version: SCHEDULE_VERSION,
        months,
    })
    .map_err(|source| RecordError::Malformed {
        record: "schedule",
        source,
    })
}

/// Reads the schedule record
///
/// Months with unparseable keys are dropped. Sequences whose length does not
/// match their month are truncated or padded with WORK.
pub fn deserialize_schedule(text: &str) -> Result<Decoded<ScheduleStore>, RecordError> {
    let repr: ScheduleRepr =
        serde_json::from_str(text).map_err(|source| RecordError::Malformed {
            record: "schedule",
            source,
        })?;

    let raw = match repr {
        ScheduleRepr::Versioned(record) => {
            check_version("schedule", record.version, SCHEDULE_VERSION)?;
            record.months
        }
        ScheduleRepr::Bare(months) => months,
    };

    let mut notices = Vec::new();
    let mut months: BTreeMap<MonthKey, MonthlySchedule> = BTreeMap::new();

    for (raw_key, entries) in raw {
        let key: MonthKey = match raw_key.parse() {
            Ok(key) => key,
            Err(e) => {
                notices.push(format!("Dropped month '{}': {}", raw_key, e));
                continue;
            }
        };
        let days_in_month = key.days_in_month();

        // `2025-7` and `2025-07` name the same month; the first one read wins.
        let schedule = months.entry(key).or_default();
        for (id, statuses) in entries {
            if schedule.contains(&id) {
                notices.push(format!("Ignored repeated entry for '{}' in {}", id, key));
                continue;
            }
            let mut days = DaySequence::from_statuses(statuses);
            let found = days.len();
            if days.fit_to(days_in_month) {
                notices.push(format!(
                    "Resized schedule of '{}' in {} from {} to {} days",
                    id, key, found, days_in_month
                ));
            }
            schedule.insert(id, days);
        }
    }

    Ok(Decoded {
        value: ScheduleStore::from_months(months),
        notices,
    })
}

fn check_version(record: &'static str, found: u32, supported: u32) -> Result<(), RecordError> {
    if found > supported {
        return Err(RecordError::UnsupportedVersion {
            record,
            found,
            supported,
        });
    }
    Ok(())
}
