// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic background refresh.
//!
//! A [`BackgroundMonitor`] runs one task that sleeps for its interval, runs
//! the refresh action, and repeats. The next sleep only starts after the
//! previous refresh has finished, so refreshes never overlap.
//!
//! Stopping is cooperative: it clears the task's run flag, and the task
//! exits the next time it wakes. A refresh already in progress completes.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Handle to the running refresh task.
#[derive(Debug)]
struct Running {
    active: Arc<AtomicBool>,
    // Kept so the task is owned; stop never aborts it.
    _task: JoinHandle<()>,
}

/// A cancellable periodic task.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use senseme_lib::monitor::BackgroundMonitor;
///
/// # #[tokio::main]
/// # async fn main() {
/// let monitor = BackgroundMonitor::new(Duration::from_secs(45));
///
/// assert!(monitor.start(|| async { /* refresh */ }));
/// assert!(!monitor.start(|| async {}));
/// assert!(monitor.is_active());
///
/// monitor.stop();
/// assert!(!monitor.is_active());
/// # }
/// ```
#[derive(Debug)]
pub struct BackgroundMonitor {
    interval: Duration,
    running: Mutex<Option<Running>>,
}

impl BackgroundMonitor {
    /// Creates a stopped monitor.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: Mutex::new(None),
        }
    }

    /// Returns the refresh interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` between [`start`](Self::start) and [`stop`](Self::stop).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|running| running.active.load(Ordering::Acquire))
    }

    /// Starts the refresh task.
    ///
    /// Returns `false` without doing anything if the monitor is already
    /// active or the interval is zero. Must be called within a tokio runtime.
    pub fn start<F, Fut>(&self, refresh: F) -> bool
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.interval.is_zero() {
            tracing::warn!("Monitor interval is zero, not starting");
            return false;
        }

        let mut running = self.running.lock();
        if running
            .as_ref()
            .is_some_and(|r| r.active.load(Ordering::Acquire))
        {
            tracing::debug!("Monitor already running");
            return false;
        }

        // A fresh flag per start: a task left over from an earlier stop keeps
        // its own cleared flag and exits on its next wake-up.
        let active = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&active);
        let interval = self.interval;

        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if !flag.load(Ordering::Acquire) {
                    break;
                }
                refresh().await;
            }
            tracing::debug!("Monitor task exited");
        });

        tracing::info!(interval_secs = interval.as_secs(), "Monitor started");
        *running = Some(Running {
            active,
            _task: task,
        });
        true
    }

    /// Stops the refresh task after its current cycle.
    ///
    /// Returns `false` if the monitor was not active.
    pub fn stop(&self) -> bool {
        let running = self.running.lock();
        match running.as_ref() {
            Some(r) if r.active.swap(false, Ordering::AcqRel) => {
                tracing::info!("Monitor stopped");
                true
            }
            _ => false,
        }
    }
}

impl Drop for BackgroundMonitor {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().as_ref() {
            running.active.store(false, Ordering::Release);
        }
    }
}
