// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device snapshot cache with a time-to-live.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::{Clock, StateChange, StateSnapshot, TokioClock};
use crate::response::AttributeValue;

/// Holds at most one [`StateSnapshot`].
///
/// Freshness is measured from capture time; reading a snapshot does not
/// extend its life. Full replacement (monitor refresh) and patching
/// (write-through) may race; the last writer wins.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use std::time::Duration;
/// use senseme_lib::state::{ManualClock, StateCache};
///
/// let clock = Arc::new(ManualClock::new());
/// let cache = StateCache::with_clock(Duration::from_secs(45), clock.clone());
///
/// cache.replace(BTreeMap::new());
/// assert!(cache.fresh().is_some());
///
/// clock.advance(Duration::from_secs(46));
/// assert!(cache.fresh().is_none());
/// assert!(cache.get().is_some());
/// ```
#[derive(Debug)]
pub struct StateCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<Arc<StateSnapshot>>>,
}

impl StateCache {
    /// Creates an empty cache using the tokio clock.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(TokioClock))
    }

    /// Creates an empty cache using the given clock.
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: RwLock::new(None),
        }
    }

    /// Returns the time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the current snapshot regardless of age.
    #[must_use]
    pub fn get(&self) -> Option<Arc<StateSnapshot>> {
        self.entry.read().clone()
    }

    /// Returns the current snapshot if it is no older than the TTL.
    #[must_use]
    pub fn fresh(&self) -> Option<Arc<StateSnapshot>> {
        let snapshot = self.get()?;
        let age = self.clock.now().saturating_duration_since(snapshot.captured_at());
        (age <= self.ttl).then_some(snapshot)
    }

    /// Returns `true` if a snapshot is present.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.entry.read().is_some()
    }

    /// Replaces the snapshot with one captured now.
    pub fn replace(&self, attributes: BTreeMap<String, AttributeValue>) -> Arc<StateSnapshot> {
        let snapshot = Arc::new(StateSnapshot::new(attributes, self.clock.now()));
        *self.entry.write() = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Patches the current snapshot in place.
    ///
    /// Returns `false` if there is no snapshot or nothing changed. Readers
    /// holding the previous snapshot keep seeing it unchanged.
    pub fn patch(&self, change: &StateChange) -> bool {
        let mut entry = self.entry.write();
        match entry.as_mut() {
            Some(snapshot) => Arc::make_mut(snapshot).apply(change),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ManualClock;

    fn attributes() -> BTreeMap<String, AttributeValue> {
        let mut map = BTreeMap::new();
        map.insert("FAN;PWR".to_string(), AttributeValue::scalar("ON"));
        map.insert("FAN;SPD;ACTUAL".to_string(), AttributeValue::scalar("5"));
        map
    }

    fn cache() -> (StateCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = StateCache::with_clock(Duration::from_secs(45), clock.clone());
        (cache, clock)
    }

    #[test]
    fn empty_cache() {
        let (cache, _) = cache();
        assert!(!cache.is_populated());
        assert!(cache.get().is_none());
        assert!(cache.fresh().is_none());
        assert!(!cache.patch(&StateChange::attribute("FAN;PWR", "OFF".into())));
    }

    #[test]
    fn expiry_is_measured_from_capture() {
        let (cache, clock) = cache();
        cache.replace(attributes());

        clock.advance(Duration::from_millis(44_999));
        assert!(cache.fresh().is_some());
        // Reading does not extend the lifetime
        clock.advance(Duration::from_millis(2));
        assert!(cache.fresh().is_none());
        assert!(cache.get().is_some());
    }

    #[test]
    fn replace_resets_expiry() {
        let (cache, clock) = cache();
        cache.replace(attributes());
        clock.advance(Duration::from_secs(60));
        assert!(cache.fresh().is_none());

        cache.replace(BTreeMap::new());
        assert!(cache.fresh().is_some_and(|s| s.is_empty()));
    }

    #[test]
    fn patch_keeps_capture_time() {
        let (cache, clock) = cache();
        let before = cache.replace(attributes());
        clock.advance(Duration::from_secs(10));

        assert!(cache.patch(&StateChange::write_through("FAN;PWR", "OFF".into())));

        let after = cache.get().unwrap();
        assert_eq!(after.captured_at(), before.captured_at());
        assert_eq!(after.get("FAN;SPD;ACTUAL"), Some(&AttributeValue::scalar("0")));
        // Previously handed-out snapshots are unaffected
        assert_eq!(before.get("FAN;SPD;ACTUAL"), Some(&AttributeValue::scalar("5")));
    }
}
