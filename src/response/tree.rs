// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hierarchical view of device state for JSON and XML export.

use std::collections::BTreeMap;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;

use super::AttributeValue;
use crate::error::ParseError;

/// Child key holding the value of a path that is also a prefix of longer
/// paths, e.g. `SLEEP;EVENT` next to `SLEEP;EVENT;OFF`.
pub const LEAF_KEY: &str = "VALUE";

/// Root element name of the XML export.
const XML_ROOT: &str = "data";

/// Element name of each tuple field in the XML export.
const XML_ITEM: &str = "i";

/// One node of an [`AttributeTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Nested path segments.
    Branch(AttributeTree),
    /// An attribute value.
    Leaf(AttributeValue),
}

/// Device state nested by path segment.
///
/// `FAN;SPD;ACTUAL = 3` becomes `{"FAN": {"SPD": {"ACTUAL": "3"}}}`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use senseme_lib::response::{AttributeTree, AttributeValue};
///
/// let mut flat = BTreeMap::new();
/// flat.insert("FAN;SPD;ACTUAL".to_string(), AttributeValue::scalar("3"));
/// flat.insert("FAN;PWR".to_string(), AttributeValue::scalar("ON"));
///
/// let tree = AttributeTree::from_flat(&flat);
/// assert_eq!(
///     tree.to_json().unwrap(),
///     r#"{"FAN":{"PWR":"ON","SPD":{"ACTUAL":"3"}}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct AttributeTree(BTreeMap<String, Node>);

impl AttributeTree {
    /// Builds a tree from a flat path-to-value mapping.
    #[must_use]
    pub fn from_flat<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a AttributeValue)>,
    {
        let mut tree = Self::default();
        for (path, value) in attributes {
            let segments: Vec<&str> = path.split(';').collect();
            tree.insert(&segments, value.clone());
        }
        tree
    }

    fn insert(&mut self, path: &[&str], value: AttributeValue) {
        let Some((head, rest)) = path.split_first() else {
            return;
        };

        if rest.is_empty() {
            if let Some(Node::Branch(branch)) = self.0.get_mut(*head) {
                branch.0.insert(LEAF_KEY.to_string(), Node::Leaf(value));
            } else {
                self.0.insert((*head).to_string(), Node::Leaf(value));
            }
            return;
        }

        let entry = self
            .0
            .entry((*head).to_string())
            .or_insert_with(|| Node::Branch(Self::default()));

        if let Node::Leaf(existing) = &*entry {
            let mut branch = Self::default();
            branch
                .0
                .insert(LEAF_KEY.to_string(), Node::Leaf(existing.clone()));
            *entry = Node::Branch(branch);
        }

        if let Node::Branch(branch) = entry {
            branch.insert(rest, value);
        }
    }

    /// Returns the child node for a path segment.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&Node> {
        self.0.get(segment)
    }

    /// Returns the number of top-level segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the tree holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes the tree as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Export` if serialization fails.
    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the tree as an XML document rooted at `<data>`.
    ///
    /// Tuple values become repeated `<i>` children.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Export` if writing fails.
    pub fn to_xml(&self) -> Result<String, ParseError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Start(BytesStart::new(XML_ROOT)))?;
        write_branch(&mut writer, self)?;
        writer.write_event(Event::End(BytesEnd::new(XML_ROOT)))?;
        String::from_utf8(writer.into_inner()).map_err(|e| ParseError::Export(e.to_string()))
    }
}

fn write_branch(writer: &mut Writer<Vec<u8>>, tree: &AttributeTree) -> Result<(), ParseError> {
    for (name, node) in &tree.0 {
        writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
        match node {
            Node::Branch(branch) => write_branch(writer, branch)?,
            Node::Leaf(AttributeValue::Scalar(text)) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            Node::Leaf(AttributeValue::Tuple(items)) => {
                for item in items {
                    writer.write_event(Event::Start(BytesStart::new(XML_ITEM)))?;
                    writer.write_event(Event::Text(BytesText::new(item)))?;
                    writer.write_event(Event::End(BytesEnd::new(XML_ITEM)))?;
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(entries: &[(&str, AttributeValue)]) -> BTreeMap<String, AttributeValue> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn nests_paths() {
        let state = flat(&[
            ("FAN;SPD;ACTUAL", AttributeValue::scalar("3")),
            ("FAN;SPD;MAX", AttributeValue::scalar("7")),
        ]);
        let tree = AttributeTree::from_flat(&state);
        let Some(Node::Branch(fan)) = tree.get("FAN") else {
            panic!("FAN should be a branch");
        };
        let Some(Node::Branch(speed)) = fan.get("SPD") else {
            panic!("SPD should be a branch");
        };
        assert_eq!(speed.get("MAX"), Some(&Node::Leaf(AttributeValue::scalar("7"))));
        assert_eq!(speed.len(), 2);
    }

    #[test]
    fn leaf_and_prefix_coexist() {
        let state = flat(&[
            ("SLEEP;EVENT", AttributeValue::scalar("ON")),
            ("SLEEP;EVENT;OFF", AttributeValue::scalar("0")),
        ]);
        let tree = AttributeTree::from_flat(&state);
        assert_eq!(
            tree.to_json().unwrap(),
            r#"{"SLEEP":{"EVENT":{"OFF":"0","VALUE":"ON"}}}"#
        );
    }

    #[test]
    fn tuple_values_export_as_arrays() {
        let state = flat(&[("FAN;BOOKENDS", AttributeValue::tuple(["2", "7"]))]);
        let tree = AttributeTree::from_flat(&state);
        assert_eq!(tree.to_json().unwrap(), r#"{"FAN":{"BOOKENDS":["2","7"]}}"#);
    }

    #[test]
    fn xml_export() {
        let state = flat(&[
            ("FAN;PWR", AttributeValue::scalar("ON")),
            ("LIGHT;BOOKENDS", AttributeValue::tuple(["0", "16"])),
        ]);
        let xml = AttributeTree::from_flat(&state).to_xml().unwrap();
        assert_eq!(
            xml,
            "<data><FAN><PWR>ON</PWR></FAN><LIGHT><BOOKENDS><i>0</i><i>16</i></BOOKENDS></LIGHT></data>"
        );
    }

    #[test]
    fn xml_escapes_text() {
        let state = flat(&[("NW;SSID", AttributeValue::scalar("a&b"))]);
        let xml = AttributeTree::from_flat(&state).to_xml().unwrap();
        assert_eq!(xml, "<data><NW><SSID>a&amp;b</SSID></NW></data>");
    }

    #[test]
    fn empty_tree() {
        let tree = AttributeTree::from_flat(&BTreeMap::new());
        assert!(tree.is_empty());
        assert_eq!(tree.to_json().unwrap(), "{}");
        assert_eq!(tree.to_xml().unwrap(), "<data></data>");
    }
}
