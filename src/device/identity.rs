// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identity.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Who a device is and where to reach it.
///
/// Fixed when a [`Device`](crate::Device) is created.
///
/// # Examples
///
/// ```
/// use senseme_lib::DeviceIdentity;
///
/// let identity = DeviceIdentity::new("LivingRoomFan", "10.0.0.5".parse().unwrap())
///     .with_mac("AA:BB:CC:DD:EE:FF")
///     .with_model("FAN")
///     .with_series("LSERIES");
///
/// assert_eq!(
///     identity.to_string(),
///     "SenseMe Device: LivingRoomFan, Series: LSERIES"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    name: String,
    ip: IpAddr,
    #[serde(default)]
    mac: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    series: String,
}

impl DeviceIdentity {
    /// Creates an identity with the given name and address.
    #[must_use]
    pub fn new(name: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            name: name.into(),
            ip,
            mac: String::new(),
            model: String::new(),
            series: String::new(),
        }
    }

    /// Sets the MAC address.
    #[must_use]
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = mac.into();
        self
    }

    /// Sets the model, e.g. `FAN`.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the series, e.g. `LSERIES`.
    #[must_use]
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = series.into();
        self
    }

    /// Returns the device name used to address commands.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device IP address.
    #[must_use]
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Returns the MAC address, empty if unknown.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Returns the model, empty if unknown.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the series, empty if unknown.
    #[must_use]
    pub fn series(&self) -> &str {
        &self.series
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SenseMe Device: {}, Series: {}", self.name, self.series)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn serde_round_trip() {
        let identity = DeviceIdentity::new("Fan", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)))
            .with_mac("AA:BB:CC:DD:EE:FF");
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Fan","ip":"10.0.0.5","mac":"AA:BB:CC:DD:EE:FF","model":"","series":""}"#
        );
        let back: DeviceIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let identity: DeviceIdentity =
            serde_json::from_str(r#"{"name":"Fan","ip":"10.0.0.5"}"#).unwrap();
        assert_eq!(identity.mac(), "");
        assert_eq!(identity.ip(), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)));
    }
}
