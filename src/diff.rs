//! Roster diffing: who joined, who left.
//!
//! Computed as set differences over normalized names. Because names are
//! normalized before they ever enter a roster, a formatting-only change in
//! the embed never shows up here. A genuine rename still appears as a
//! remove + add; that is an accepted limit of string-based identity.

use std::collections::HashSet;

use crate::types::{DriverName, Roster};

/// The outcome of comparing two rosters.
///
/// `added` follows current-roster order and `removed` follows previous-roster
/// order, but ordering is display-only and carries no downstream meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDiff {
    /// Present now, absent before.
    pub added: Vec<DriverName>,
    /// Present before, absent now.
    pub removed: Vec<DriverName>,
}

impl RosterDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compares the previous roster against the current one.
pub fn diff(previous: &Roster, current: &Roster) -> RosterDiff {
    let before: HashSet<&str> = previous.iter().map(DriverName::as_str).collect();
    let after: HashSet<&str> = current.iter().map(DriverName::as_str).collect();

    let added = current
        .iter()
        .filter(|n| !before.contains(n.as_str()))
        .cloned()
        .collect();
    let removed = previous
        .iter()
        .filter(|n| !after.contains(n.as_str()))
        .cloned()
        .collect();

    RosterDiff { added, removed }
}
