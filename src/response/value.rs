// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute values as reported in device responses.

use std::fmt;

use serde::Serialize;

use crate::error::ParseError;

/// The value of one device attribute.
///
/// Almost every attribute carries a single field. A few carry several
/// trailing fields, e.g. `FAN;BOOKENDS` (low, high) and `NW;PARAMS;ACTUAL`
/// (ip, subnet mask, gateway); those are kept as a [`AttributeValue::Tuple`].
///
/// Serializes as a JSON string or as an array of strings.
///
/// # Examples
///
/// ```
/// use senseme_lib::response::AttributeValue;
///
/// let speed = AttributeValue::scalar("5");
/// assert_eq!(speed.as_int(), Some(5));
///
/// let limits = AttributeValue::tuple(["2", "7"]);
/// assert_eq!(limits.as_pair(), Some(("2", "7")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A single field.
    Scalar(String),
    /// Several fields of a fixed-arity attribute.
    Tuple(Vec<String>),
}

impl AttributeValue {
    /// Creates a scalar value.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Creates a tuple value.
    #[must_use]
    pub fn tuple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tuple(values.into_iter().map(Into::into).collect())
    }

    /// Returns the scalar field, or `None` for tuples.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Tuple(_) => None,
        }
    }

    /// Returns the scalar parsed as an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        self.as_str().and_then(|s| s.trim().parse().ok())
    }

    /// Returns the fields of a two-field tuple.
    #[must_use]
    pub fn as_pair(&self) -> Option<(&str, &str)> {
        match self {
            Self::Tuple(values) if values.len() == 2 => Some((&values[0], &values[1])),
            _ => None,
        }
    }

    /// Returns the fields of a three-field tuple.
    #[must_use]
    pub fn as_triple(&self) -> Option<(&str, &str, &str)> {
        match self {
            Self::Tuple(values) if values.len() == 3 => {
                Some((&values[0], &values[1], &values[2]))
            }
            _ => None,
        }
    }

    /// Returns the scalar, failing with the attribute name if it is a tuple.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedShape` for tuple values.
    pub fn expect_scalar(&self, attribute: &str) -> Result<&str, ParseError> {
        self.as_str()
            .ok_or_else(|| ParseError::UnexpectedShape(attribute.to_string()))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s),
            Self::Tuple(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::scalar(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_accessors() {
        let value = AttributeValue::scalar("OFF");
        assert_eq!(value.as_str(), Some("OFF"));
        assert_eq!(value.as_int(), None);
        assert_eq!(value.as_pair(), None);
    }

    #[test]
    fn triple_accessors() {
        let value = AttributeValue::tuple(["10.0.0.5", "255.255.255.0", "10.0.0.1"]);
        assert_eq!(
            value.as_triple(),
            Some(("10.0.0.5", "255.255.255.0", "10.0.0.1"))
        );
        assert!(value.as_str().is_none());
        assert!(value.expect_scalar("NW;PARAMS;ACTUAL").is_err());
    }

    #[test]
    fn serializes_untagged() {
        let scalar = serde_json::to_string(&AttributeValue::scalar("3")).unwrap();
        let tuple = serde_json::to_string(&AttributeValue::tuple(["2", "7"])).unwrap();
        assert_eq!(scalar, "\"3\"");
        assert_eq!(tuple, "[\"2\",\"7\"]");
    }

    #[test]
    fn display_joins_tuples() {
        assert_eq!(AttributeValue::tuple(["2", "7"]).to_string(), "2,7");
    }
}
