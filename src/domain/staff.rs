//! Staff roster
//!
//! The roster is an ordered list of staff members; display order is
//! insertion order. Identities are opaque strings that stay stable across
//! renames and are never handed out twice.
//!
//! New identities are time-based (milliseconds since the Unix epoch) and
//! strictly increasing, so two members added within the same millisecond
//! still get distinct ids.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Name given to a member added without one
pub const DEFAULT_STAFF_NAME: &str = "新規スタッフ";

/// Opaque, stable identifier of a staff member
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is one of the generated kind
    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StaffId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A staff member on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
}

impl StaffMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: StaffId::new(id),
            name: name.into(),
        }
    }
}

/// Ordered list of staff members
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<StaffMember>,
    /// Highest numeric id known to this roster, issued or observed
    last_issued: u64,
}

impl Roster {
    /// Creates a roster from members in display order
    pub fn new(members: Vec<StaffMember>) -> Self {
        let last_issued = members
            .iter()
            .filter_map(|m| m.id.numeric())
            .max()
            .unwrap_or(0);
        Self {
            members,
            last_issued,
        }
    }

    /// The roster used when no saved roster exists
    pub fn seed() -> Self {
        Self::new(vec![
            StaffMember::new("1", "田中"),
            StaffMember::new("2", "佐藤"),
            StaffMember::new("3", "鈴木"),
        ])
    }

    /// Marks ids as taken so they are never generated again
    ///
    /// Used for ids that only survive in schedule history.
    pub fn reserve_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a StaffId>) {
        if let Some(max) = ids.into_iter().filter_map(StaffId::numeric).max() {
            self.last_issued = self.last_issued.max(max);
        }
    }

    /// Appends a new member with a freshly generated id
    pub fn add_staff(&mut self, name: Option<&str>) -> StaffMember {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.add_staff_at(name, now)
    }

    /// Appends a new member, generating the id from the given clock reading
    pub fn add_staff_at(&mut self, name: Option<&str>, now_millis: u64) -> StaffMember {
        let id = now_millis.max(self.last_issued.saturating_add(1));
        self.last_issued = id;

        let member = StaffMember::new(id.to_string(), name.unwrap_or(DEFAULT_STAFF_NAME));
        self.members.push(member.clone());
        member
    }

    /// Renames a member in place; returns false if the id is unknown
    pub fn rename_staff(&mut self, id: &StaffId, name: impl Into<String>) -> bool {
        match self.members.iter_mut().find(|m| &m.id == id) {
            Some(member) => {
                member.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Removes a member from the roster, returning it if present
    pub fn remove_staff(&mut self, id: &StaffId) -> Option<StaffMember> {
        let index = self.members.iter().position(|m| &m.id == id)?;
        Some(self.members.remove(index))
    }

    pub fn get(&self, id: &StaffId) -> Option<&StaffMember> {
        self.members.iter().find(|m| &m.id == id)
    }

    pub fn contains(&self, id: &StaffId) -> bool {
        self.get(id).is_some()
    }

    /// Resolves a member by exact id, falling back to exact name
    pub fn find(&self, query: &str) -> Option<&StaffMember> {
        let query = query.trim();
        self.members
            .iter()
            .find(|m| m.id.as_str() == query)
            .or_else(|| self.members.iter().find(|m| m.name == query))
    }

    pub fn members(&self) -> &[StaffMember] {
        &self.members
    }

    pub fn ids(&self) -> impl Iterator<Item = &StaffId> {
        self.members.iter().map(|m| &m.id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a StaffMember;
    type IntoIter = std::slice::Iter<'a, StaffMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_roster() {
        let roster = Roster::seed();
        let names: Vec<_> = roster.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["田中", "佐藤", "鈴木"]);
        assert_eq!(roster.members()[0].id, StaffId::from("1"));
    }

    #[test]
    fn add_appends_in_order_with_default_name() {
        let mut roster = Roster::seed();
        let added = roster.add_staff_at(None, 1_700_000_000_000);

        assert_eq!(added.name, DEFAULT_STAFF_NAME);
        assert_eq!(added.id, StaffId::from("1700000000000"));
        assert_eq!(roster.members().last(), Some(&added));
        assert_eq!(roster.len(), 4);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut roster = Roster::default();
        let a = roster.add_staff_at(Some("A"), 1000);
        let b = roster.add_staff_at(Some("B"), 1000);
        let c = roster.add_staff_at(Some("C"), 999);

        assert_eq!(a.id.as_str(), "1000");
        assert_eq!(b.id.as_str(), "1001");
        assert_eq!(c.id.as_str(), "1002");
    }

    #[test]
    fn removed_ids_are_not_reissued() {
        let mut roster = Roster::default();
        let a = roster.add_staff_at(Some("A"), 50);
        roster.remove_staff(&a.id);

        let b = roster.add_staff_at(Some("B"), 10);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn reserved_history_ids_are_skipped() {
        let mut roster = Roster::seed();
        roster.reserve_ids([&StaffId::from("5000"), &StaffId::from("not-numeric")]);

        let added = roster.add_staff_at(None, 4000);
        assert_eq!(added.id.as_str(), "5001");
    }

    #[test]
    fn rename_preserves_identity() {
        let mut roster = Roster::seed();
        let id = StaffId::from("2");

        assert!(roster.rename_staff(&id, "佐々木"));
        let member = roster.get(&id).unwrap();
        assert_eq!(member.name, "佐々木");
        assert_eq!(roster.members()[1].id, id);
    }

    #[test]
    fn rename_unknown_is_noop() {
        let mut roster = Roster::seed();
        let before = roster.clone();

        assert!(!roster.rename_staff(&StaffId::from("99"), "Ghost"));
        assert_eq!(roster, before);
    }

    #[test]
    fn remove_keeps_order_of_others() {
        let mut roster = Roster::seed();
        let removed = roster.remove_staff(&StaffId::from("2")).unwrap();

        assert_eq!(removed.name, "佐藤");
        let ids: Vec<_> = roster.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(roster.remove_staff(&StaffId::from("2")).is_none());
    }

    #[test]
    fn find_by_id_or_name() {
        let roster = Roster::seed();
        assert_eq!(roster.find("3").unwrap().name, "鈴木");
        assert_eq!(roster.find("田中").unwrap().id.as_str(), "1");
        assert!(roster.find("高橋").is_none());
    }
}
