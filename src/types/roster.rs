//! The roster: an ordered list of driver display names.
//!
//! Order is signup order and is load-bearing for seat/waitlist classification.
//! Uniqueness is not guaranteed by the embed data; duplicates are tolerated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A driver's display name after normalization.
///
/// Names only enter a [`Roster`] through `extract::normalize_name`, so two
/// `DriverName`s compare equal iff the normalized strings match. Identity is
/// string-based; a driver who renames themselves appears as a remove + add.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverName(pub String);

impl DriverName {
    pub fn new(s: impl Into<String>) -> Self {
        DriverName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DriverName {
    fn from(s: String) -> Self {
        DriverName(s)
    }
}

impl From<&str> for DriverName {
    fn from(s: &str) -> Self {
        DriverName(s.to_string())
    }
}

/// An ordered sequence of driver names, in signup order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(pub Vec<DriverName>);

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Roster(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, name: DriverName) {
        self.0.push(name);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DriverName> {
        self.0.iter()
    }

    /// Returns the names as a slice, signup order preserved.
    pub fn names(&self) -> &[DriverName] {
        &self.0
    }

    /// Returns the names as plain strings, for payloads and display.
    pub fn as_strings(&self) -> Vec<String> {
        self.0.iter().map(|n| n.0.clone()).collect()
    }
}

impl FromIterator<DriverName> for Roster {
    fn from_iter<I: IntoIterator<Item = DriverName>>(iter: I) -> Self {
        Roster(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a DriverName;
    type IntoIter = std::slice::Iter<'a, DriverName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
