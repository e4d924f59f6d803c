// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for the SenseMe ASCII protocol.
//!
//! Responses are parenthesized, semicolon-delimited segments:
//! `(DeviceName;CATEGORY[;SUBCATEGORY...];VALUE)`. Several may arrive
//! concatenated without a separator.
//!
//! - [`extract_value`] decodes a single-value query answer.
//! - [`parse_full_state`] decodes the `GETALL` fragment stream into a flat
//!   path-to-value mapping, honouring the multi-field shapes listed in
//!   [`IRREGULAR_SHAPES`].
//! - [`AttributeTree`] nests that mapping for JSON/XML export.

mod full_state;
pub mod keys;
mod shapes;
mod tokenizer;
mod tree;
mod value;

pub use full_state::{extract_value, parse_full_state};
pub use shapes::{IRREGULAR_SHAPES, IrregularShape, PathMatch, split_attribute};
pub use tokenizer::{Segment, split_segments};
pub use tree::{AttributeTree, LEAF_KEY, Node};
pub use value::AttributeValue;
