// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device connection and caching settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;
use crate::protocol::DEFAULT_PORT;

/// Settings for one [`Device`](crate::Device).
///
/// Durations serialize as (fractional) seconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use senseme_lib::DeviceConfig;
///
/// let config = DeviceConfig::default()
///     .with_timeout(Duration::from_secs(3))
///     .with_cache_ttl(Duration::from_secs(30));
///
/// assert_eq!(config.port(), 31415);
/// assert_eq!(config.monitor_interval(), Duration::from_secs(45));
///
/// let json = serde_json::to_string(&config).unwrap();
/// assert_eq!(
///     json,
///     r#"{"port":31415,"timeout":3.0,"cache_ttl":30.0,"monitor_interval":45.0}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    port: u16,
    #[serde(with = "seconds")]
    timeout: Duration,
    #[serde(with = "seconds")]
    cache_ttl: Duration,
    #[serde(with = "seconds")]
    monitor_interval: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(45),
            monitor_interval: Duration::from_secs(45),
        }
    }
}

impl DeviceConfig {
    /// Creates a configuration with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TCP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connect and per-read timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how long a full-state snapshot stays fresh.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the background monitor's refresh interval.
    #[must_use]
    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval = interval;
        self
    }

    /// Returns the TCP port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the connect and per-read timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the snapshot time-to-live.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Returns the monitor refresh interval.
    #[must_use]
    pub fn monitor_interval(&self) -> Duration {
        self.monitor_interval
    }

    /// Checks that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if the timeout or the
    /// monitor interval is zero.
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.timeout.is_zero() {
            return Err(DeviceError::InvalidConfiguration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.monitor_interval.is_zero() {
            return Err(DeviceError::InvalidConfiguration(
                "monitor interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DeviceConfig::new();
        assert_eq!(config.port(), 31415);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.cache_ttl(), Duration::from_secs(45));
        assert_eq!(config.monitor_interval(), Duration::from_secs(45));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: DeviceConfig = serde_json::from_str(r#"{"cache_ttl":1.5}"#).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_millis(1500));
        assert_eq!(config.port(), 31415);
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert!(serde_json::from_str::<DeviceConfig>(r#"{"timeout":-1}"#).is_err());
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let config = DeviceConfig::new().with_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(DeviceError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_ttl_is_allowed() {
        let config = DeviceConfig::new().with_cache_ttl(Duration::ZERO);
        assert!(config.validate().is_ok());
    }
}
