// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of single-value answers and the `GETALL` fragment stream.

use std::collections::BTreeMap;

use super::shapes::split_attribute;
use super::tokenizer::{Segment, split_segments};
use super::AttributeValue;

/// Extracts the value of a single-value query response.
///
/// The value is the last field of the last complete segment. Returns `None`
/// (the failure sentinel) when the response does not have the
/// `(Name;...;VALUE)` shape.
///
/// # Examples
///
/// ```
/// use senseme_lib::response::extract_value;
///
/// assert_eq!(extract_value("(Fan;FAN;SPD;ACTUAL;3)"), Some("3".to_string()));
/// assert_eq!(extract_value("garbage"), None);
/// ```
#[must_use]
pub fn extract_value(response: &str) -> Option<String> {
    let body = split_segments(response).pop()?;
    let segment = Segment::parse(body)?;
    segment
        .last_field()
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Decodes the fragments of a full-state response into a flat mapping of
/// attribute path to value.
///
/// Fragments are concatenated first, so segments glued together (`)(`) or
/// split across packets decode the same as well-delimited ones. Segments
/// that do not carry both a path and a value are skipped.
///
/// # Examples
///
/// ```
/// use senseme_lib::response::{parse_full_state, AttributeValue};
///
/// let state = parse_full_state(&["(Fan;FAN;BOOKENDS;2;7)"]);
/// assert_eq!(state["FAN;BOOKENDS"], AttributeValue::tuple(["2", "7"]));
/// ```
#[must_use]
pub fn parse_full_state<S: AsRef<str>>(fragments: &[S]) -> BTreeMap<String, AttributeValue> {
    let text: String = fragments.iter().map(AsRef::as_ref).collect();
    let mut attributes = BTreeMap::new();

    for body in split_segments(&text) {
        let Some((path, value)) = Segment::parse(body).and_then(|s| split_attribute(&s.fields))
        else {
            tracing::warn!(segment = %body, "Skipping malformed state segment");
            continue;
        };
        attributes.insert(path, value);
    }

    tracing::debug!(count = attributes.len(), "Decoded full-state response");
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_last_field() {
        assert_eq!(
            extract_value("(Living Room Fan;FAN;PWR;ON)"),
            Some("ON".to_string())
        );
        assert_eq!(extract_value("(A;B;C;V)"), Some("V".to_string()));
    }

    #[test]
    fn extract_uses_last_glued_segment() {
        assert_eq!(extract_value("(A;X;1)(A;Y;2)"), Some("2".to_string()));
    }

    #[test]
    fn extract_rejects_malformed() {
        assert_eq!(extract_value(""), None);
        assert_eq!(extract_value("(Fan)"), None);
        assert_eq!(extract_value("(Fan;FAN;PWR;)"), None);
        assert_eq!(extract_value("Fan;FAN;PWR;ON"), None);
    }

    #[test]
    fn parses_glued_fragments() {
        let state = parse_full_state(&["(A;X;1)(A;Y;2)"]);
        assert_eq!(state.len(), 2);
        assert_eq!(state["X"], AttributeValue::scalar("1"));
        assert_eq!(state["Y"], AttributeValue::scalar("2"));
    }

    #[test]
    fn parses_bookends_pair() {
        let state = parse_full_state(&["(Name;FAN;BOOKENDS;2;7)"]);
        assert_eq!(state["FAN;BOOKENDS"], AttributeValue::tuple(["2", "7"]));
    }

    #[test]
    fn parses_mixed_fragments() {
        let fragments = vec![
            "(Fan;FAN;PWR;ON)".to_string(),
            "(Fan;NW;PARAMS;ACTUAL;10.0.0.5;255.255.255.0;10.0.0.1)(Fan;LIGHT;BOOKENDS;0;16)"
                .to_string(),
            "(Fan;FAN;SPD;ACTUAL;".to_string(),
            "4)".to_string(),
        ];
        let state = parse_full_state(&fragments);
        assert_eq!(state["FAN;PWR"], AttributeValue::scalar("ON"));
        assert_eq!(state["FAN;SPD;ACTUAL"], AttributeValue::scalar("4"));
        assert_eq!(
            state["NW;PARAMS;ACTUAL"].as_triple(),
            Some(("10.0.0.5", "255.255.255.0", "10.0.0.1"))
        );
        assert_eq!(state["LIGHT;BOOKENDS"].as_pair(), Some(("0", "16")));
    }

    #[test]
    fn skips_segments_without_value() {
        let state = parse_full_state(&["(Fan;GETALL)(Fan;FAN;DIR;FWD)"]);
        assert_eq!(state.len(), 1);
        assert_eq!(state["FAN;DIR"], AttributeValue::scalar("FWD"));
    }

    #[test]
    fn empty_input_yields_empty_state() {
        let state = parse_full_state::<&str>(&[]);
        assert!(state.is_empty());
    }
}
