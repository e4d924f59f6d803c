// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Splits raw response text into parenthesized segments and their fields.
//!
//! Devices may deliver several responses back to back with no separator,
//! e.g. `(Fan;FAN;PWR;ON)(Fan;FAN;SPD;ACTUAL;3)`, and a single response may
//! be split across packets. Scanning the concatenated text for `(`/`)` pairs
//! handles both.

/// One `(Name;FIELD;...;VALUE)` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Name of the device that sent the segment.
    pub device: &'a str,
    /// Fields following the device name.
    pub fields: Vec<&'a str>,
}

impl<'a> Segment<'a> {
    /// Splits the body of a segment (the text between the parentheses).
    ///
    /// Returns `None` when the body has no field after the device name.
    #[must_use]
    pub fn parse(body: &'a str) -> Option<Self> {
        let mut parts = body.split(';');
        let device = parts.next()?;
        let fields: Vec<&str> = parts.collect();
        if fields.is_empty() {
            return None;
        }
        Some(Self { device, fields })
    }

    /// Returns the last field.
    #[must_use]
    pub fn last_field(&self) -> Option<&'a str> {
        self.fields.last().copied()
    }
}

/// Returns the bodies of all complete `( ... )` segments in `text`.
///
/// Text outside parentheses is ignored. An opening parenthesis inside an
/// unterminated segment restarts the segment.
#[must_use]
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut bodies = Vec::new();
    let mut start = None;

    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => {
                if start.is_some() {
                    tracing::warn!(offset = idx, "Unterminated response segment, discarding");
                }
                start = Some(idx + 1);
            }
            ')' => {
                if let Some(begin) = start.take() {
                    bodies.push(&text[begin..idx]);
                }
            }
            _ => {}
        }
    }

    if start.is_some() {
        tracing::warn!("Response ended inside a segment");
    }

    bodies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_single_segment() {
        assert_eq!(split_segments("(Fan;FAN;PWR;ON)"), vec!["Fan;FAN;PWR;ON"]);
    }

    #[test]
    fn splits_glued_segments() {
        assert_eq!(
            split_segments("(A;X;1)(A;Y;2)"),
            vec!["A;X;1", "A;Y;2"]
        );
    }

    #[test]
    fn joins_segment_split_across_fragments() {
        let text = ["(A;X;", "1)(A;Y;2)"].concat();
        assert_eq!(split_segments(&text), vec!["A;X;1", "A;Y;2"]);
    }

    #[test]
    fn ignores_noise_and_unterminated() {
        assert_eq!(split_segments("junk(A;X;1)\r\n(A;Y"), vec!["A;X;1"]);
        assert_eq!(split_segments("(A;X(A;Y;2)"), vec!["A;Y;2"]);
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn segment_parse_fields() {
        let segment = Segment::parse("Living Room;FAN;SPD;ACTUAL;3").unwrap();
        assert_eq!(segment.device, "Living Room");
        assert_eq!(segment.fields, vec!["FAN", "SPD", "ACTUAL", "3"]);
        assert_eq!(segment.last_field(), Some("3"));
    }

    #[test]
    fn segment_without_fields_is_rejected() {
        assert!(Segment::parse("Fan").is_none());
    }
}
