// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-in-time capture of device attributes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use super::StateChange;
use crate::error::ParseError;
use crate::response::{AttributeTree, AttributeValue};

/// Every attribute returned by one full-state query.
///
/// Captured once and then only patched by write-through; the capture time
/// is kept both as a monotonic instant (for expiry) and as wall-clock time.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use senseme_lib::response::AttributeValue;
/// use senseme_lib::state::StateSnapshot;
///
/// let mut attributes = BTreeMap::new();
/// attributes.insert("FAN;PWR".to_string(), AttributeValue::scalar("ON"));
///
/// let snapshot = StateSnapshot::new(attributes, tokio::time::Instant::now());
/// assert_eq!(snapshot.get("FAN;PWR"), Some(&AttributeValue::scalar("ON")));
/// assert!(snapshot.get("FAN;DIR").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    attributes: BTreeMap<String, AttributeValue>,
    captured_at: Instant,
    timestamp: DateTime<Utc>,
}

impl StateSnapshot {
    /// Creates a snapshot captured at `captured_at`.
    #[must_use]
    pub fn new(attributes: BTreeMap<String, AttributeValue>, captured_at: Instant) -> Self {
        Self {
            attributes,
            captured_at,
            timestamp: Utc::now(),
        }
    }

    /// Returns the value of one attribute.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&AttributeValue> {
        self.attributes.get(path)
    }

    /// Returns the flat attribute mapping.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Returns the monotonic capture instant.
    #[must_use]
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    /// Returns the wall-clock capture time.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the snapshot holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Applies a change, returning `true` if any value changed.
    ///
    /// The capture time is left untouched.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        let mut changed = false;
        for (path, value) in change.flatten() {
            if self.attributes.get(&path) != Some(&value) {
                self.attributes.insert(path, value);
                changed = true;
            }
        }
        changed
    }

    /// Builds the nested view of this snapshot.
    #[must_use]
    pub fn tree(&self) -> AttributeTree {
        AttributeTree::from_flat(&self.attributes)
    }

    /// Serializes the nested view as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Export` if serialization fails.
    pub fn to_json(&self) -> Result<String, ParseError> {
        self.tree().to_json()
    }

    /// Serializes the nested view as XML.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Export` if serialization fails.
    pub fn to_xml(&self) -> Result<String, ParseError> {
        self.tree().to_xml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StateSnapshot {
        let mut attributes = BTreeMap::new();
        attributes.insert("FAN;PWR".to_string(), AttributeValue::scalar("ON"));
        attributes.insert("FAN;SPD;ACTUAL".to_string(), AttributeValue::scalar("3"));
        attributes.insert(
            "FAN;BOOKENDS".to_string(),
            AttributeValue::tuple(["1", "7"]),
        );
        StateSnapshot::new(attributes, Instant::now())
    }

    #[test]
    fn lookup() {
        let snap = snapshot();
        assert_eq!(snap.len(), 3);
        assert!(!snap.is_empty());
        assert_eq!(snap.get("FAN;SPD;ACTUAL").and_then(AttributeValue::as_int), Some(3));
        assert_eq!(
            snap.get("FAN;BOOKENDS").and_then(AttributeValue::as_pair),
            Some(("1", "7"))
        );
    }

    #[test]
    fn apply_reports_changes() {
        let mut snap = snapshot();
        let captured = snap.captured_at();

        assert!(snap.apply(&StateChange::write_through("FAN;PWR", "OFF".into())));
        assert_eq!(snap.get("FAN;SPD;ACTUAL"), Some(&AttributeValue::scalar("0")));
        assert_eq!(snap.get("FAN;WHOOSH;STATUS"), Some(&AttributeValue::scalar("OFF")));
        assert_eq!(snap.captured_at(), captured);

        assert!(!snap.apply(&StateChange::attribute("FAN;PWR", "OFF".into())));
    }

    #[test]
    fn exports_nested_json() {
        let snap = snapshot();
        assert_eq!(
            snap.to_json().unwrap(),
            r#"{"FAN":{"BOOKENDS":["1","7"],"PWR":"ON","SPD":{"ACTUAL":"3"}}}"#
        );
    }
}
