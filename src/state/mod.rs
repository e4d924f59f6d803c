// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached device state.
//!
//! A [`StateCache`] holds the latest [`StateSnapshot`] of one device. The
//! snapshot is replaced wholesale by a full-state fetch and patched by
//! [`StateChange`]s after successful setters.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::time::Duration;
//! use senseme_lib::response::AttributeValue;
//! use senseme_lib::state::{StateCache, StateChange};
//!
//! let cache = StateCache::new(Duration::from_secs(45));
//!
//! let mut attributes = BTreeMap::new();
//! attributes.insert("LIGHT;PWR".to_string(), AttributeValue::scalar("ON"));
//! attributes.insert("LIGHT;LEVEL;ACTUAL".to_string(), AttributeValue::scalar("8"));
//! cache.replace(attributes);
//!
//! cache.patch(&StateChange::write_through("LIGHT;PWR", AttributeValue::scalar("OFF")));
//!
//! let snapshot = cache.get().unwrap();
//! assert_eq!(snapshot.get("LIGHT;LEVEL;ACTUAL"), Some(&AttributeValue::scalar("0")));
//! ```

mod cache;
mod clock;
mod snapshot;
mod state_change;

pub use cache::StateCache;
pub use clock::{Clock, ManualClock, TokioClock};
pub use snapshot::StateSnapshot;
pub use state_change::StateChange;
