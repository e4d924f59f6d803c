// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute shapes: how many trailing fields of a segment form the value.

use super::AttributeValue;

/// How an irregular attribute is recognized from its path fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatch {
    /// Any path containing this field, e.g. `FAN;BOOKENDS` and `LIGHT;BOOKENDS`.
    Contains(&'static str),
    /// Exactly this path.
    Exact(&'static str),
}

/// An attribute whose value spans more than one trailing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrregularShape {
    /// How the attribute path is recognized.
    pub path: PathMatch,
    /// Number of trailing fields forming the value.
    pub arity: usize,
}

/// Known multi-field attributes. Not assumed exhaustive; a new shape only
/// needs an entry here.
pub const IRREGULAR_SHAPES: &[IrregularShape] = &[
    IrregularShape {
        path: PathMatch::Contains("BOOKENDS"),
        arity: 2,
    },
    IrregularShape {
        path: PathMatch::Exact("NW;PARAMS;ACTUAL"),
        arity: 3,
    },
];

impl IrregularShape {
    fn matches(&self, path: &[&str]) -> bool {
        match self.path {
            PathMatch::Contains(field) => path.contains(&field),
            PathMatch::Exact(expected) => {
                let mut expected = expected.split(';');
                path.iter().all(|field| expected.next() == Some(*field))
                    && expected.next().is_none()
            }
        }
    }
}

/// Splits the fields after the device name into an attribute path and value.
///
/// Returns `None` when there are not enough fields for a path and a value.
///
/// # Examples
///
/// ```
/// use senseme_lib::response::{split_attribute, AttributeValue};
///
/// let (path, value) = split_attribute(&["FAN", "BOOKENDS", "2", "7"]).unwrap();
/// assert_eq!(path, "FAN;BOOKENDS");
/// assert_eq!(value, AttributeValue::tuple(["2", "7"]));
/// ```
#[must_use]
pub fn split_attribute(fields: &[&str]) -> Option<(String, AttributeValue)> {
    for shape in IRREGULAR_SHAPES {
        if fields.len() <= shape.arity {
            continue;
        }
        let (path, values) = fields.split_at(fields.len() - shape.arity);
        if shape.matches(path) {
            return Some((path.join(";"), AttributeValue::tuple(values.iter().copied())));
        }
    }

    let (value, path) = fields.split_last()?;
    if path.is_empty() {
        return None;
    }
    Some((path.join(";"), AttributeValue::scalar(*value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_takes_last_field() {
        let (path, value) = split_attribute(&["FAN", "SPD", "ACTUAL", "3"]).unwrap();
        assert_eq!(path, "FAN;SPD;ACTUAL");
        assert_eq!(value, AttributeValue::scalar("3"));
    }

    #[test]
    fn bookends_take_two_fields() {
        let (path, value) = split_attribute(&["LIGHT", "BOOKENDS", "1", "16"]).unwrap();
        assert_eq!(path, "LIGHT;BOOKENDS");
        assert_eq!(value.as_pair(), Some(("1", "16")));
    }

    #[test]
    fn network_params_take_three_fields() {
        let fields = ["NW", "PARAMS", "ACTUAL", "10.0.0.5", "255.255.255.0", "10.0.0.1"];
        let (path, value) = split_attribute(&fields).unwrap();
        assert_eq!(path, "NW;PARAMS;ACTUAL");
        assert_eq!(
            value.as_triple(),
            Some(("10.0.0.5", "255.255.255.0", "10.0.0.1"))
        );
    }

    #[test]
    fn other_network_paths_stay_scalar() {
        let (path, value) = split_attribute(&["NW", "SSID", "home"]).unwrap();
        assert_eq!(path, "NW;SSID");
        assert_eq!(value, AttributeValue::scalar("home"));
    }

    #[test]
    fn too_few_fields() {
        assert!(split_attribute(&["ON"]).is_none());
        assert!(split_attribute(&[]).is_none());
    }

    #[test]
    fn short_bookends_falls_back_to_scalar() {
        let (path, value) = split_attribute(&["BOOKENDS", "2"]).unwrap();
        assert_eq!(path, "BOOKENDS");
        assert_eq!(value, AttributeValue::scalar("2"));
    }
}
