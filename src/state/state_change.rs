// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A successful setter is turned into a [`StateChange`] that patches the
//! cached snapshot in place: the written attribute, plus the attributes the
//! firmware is known to change alongside it.
//!
//! # Derived updates
//!
//! | Written | Value | Also set |
//! |---|---|---|
//! | `FAN;PWR` | `OFF` | `FAN;SPD;ACTUAL=0`, `FAN;WHOOSH;STATUS=OFF` |
//! | `FAN;SPD;ACTUAL` | `0` | `FAN;PWR=OFF`, `FAN;WHOOSH;STATUS=OFF` |
//! | `FAN;SPD;ACTUAL` | `>0` | `FAN;PWR=ON` |
//! | `LIGHT;PWR` | `OFF` | `LIGHT;LEVEL;ACTUAL=0` |
//! | `LIGHT;LEVEL;ACTUAL` | `>0` | `LIGHT;PWR=ON` |
//! | `LIGHT;LEVEL;ACTUAL` | `0` | `LIGHT;PWR=OFF` |
//!
//! The table is not exhaustive; other side effects show up at the next
//! full refresh.
//!
//! # Examples
//!
//! ```
//! use senseme_lib::response::AttributeValue;
//! use senseme_lib::state::StateChange;
//!
//! let change = StateChange::write_through("FAN;PWR", AttributeValue::scalar("OFF"));
//! let paths: Vec<_> = change.flatten().into_iter().map(|(path, _)| path).collect();
//! assert_eq!(paths, ["FAN;PWR", "FAN;SPD;ACTUAL", "FAN;WHOOSH;STATUS"]);
//! ```

use crate::response::{AttributeValue, keys};

/// A change to apply to a cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// One attribute takes a new value.
    Attribute {
        /// The attribute path.
        path: String,
        /// The new value.
        value: AttributeValue,
    },

    /// Multiple changes applied together.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a single-attribute change.
    #[must_use]
    pub fn attribute(path: impl Into<String>, value: AttributeValue) -> Self {
        Self::Attribute {
            path: path.into(),
            value,
        }
    }

    /// Creates the change for a write to `path`, including derived updates.
    #[must_use]
    pub fn write_through(path: &str, value: AttributeValue) -> Self {
        let derived = derived_updates(path, &value);
        if derived.is_empty() {
            return Self::attribute(path, value);
        }

        let mut changes = Vec::with_capacity(derived.len() + 1);
        changes.push(Self::attribute(path, value));
        changes.extend(
            derived
                .into_iter()
                .map(|(path, value)| Self::attribute(path, AttributeValue::scalar(value))),
        );
        Self::Batch(changes)
    }

    /// Returns every `(path, value)` pair in application order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, AttributeValue)> {
        match self {
            Self::Attribute { path, value } => vec![(path.clone(), value.clone())],
            Self::Batch(changes) => changes.iter().flat_map(Self::flatten).collect(),
        }
    }
}

/// Attributes known to change along with a write.
fn derived_updates(path: &str, value: &AttributeValue) -> Vec<(&'static str, &'static str)> {
    let scalar = value.as_str();
    let level = value.as_int();

    match path {
        keys::FAN_POWER if scalar == Some("OFF") => {
            vec![(keys::FAN_SPEED, "0"), (keys::FAN_WHOOSH, "OFF")]
        }
        keys::FAN_SPEED => match level {
            Some(0) => vec![(keys::FAN_POWER, "OFF"), (keys::FAN_WHOOSH, "OFF")],
            Some(n) if n > 0 => vec![(keys::FAN_POWER, "ON")],
            _ => Vec::new(),
        },
        keys::LIGHT_POWER if scalar == Some("OFF") => vec![(keys::LIGHT_LEVEL, "0")],
        keys::LIGHT_LEVEL => match level {
            Some(0) => vec![(keys::LIGHT_POWER, "OFF")],
            Some(n) if n > 0 => vec![(keys::LIGHT_POWER, "ON")],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
