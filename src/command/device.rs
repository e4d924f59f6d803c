// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-wide, sensor and raw commands.

use crate::command::{Command, fields};
use crate::response::{AttributeValue, keys};
use crate::types::PowerState;

/// Name that addresses every device on the network.
pub const BROADCAST_NAME: &str = "ALL";

/// Commands addressing the device as a whole.
///
/// # Examples
///
/// ```
/// use senseme_lib::command::{Command, DeviceCommand};
///
/// assert_eq!(DeviceCommand::GetAll.to_wire("Fan"), "<Fan;GETALL>");
/// assert_eq!(DeviceCommand::identify(), "<ALL;DEVICE;ID;GET>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Query (most of) the device state at once.
    GetAll,
    /// Ask devices to announce their identity.
    GetId,
    /// Switch the beeper on or off.
    SetBeeper(PowerState),
    /// Switch the indicator LEDs on or off.
    SetIndicators(PowerState),
}

impl DeviceCommand {
    /// Returns the discovery request addressed to all devices.
    #[must_use]
    pub fn identify() -> String {
        Self::GetId.to_wire(BROADCAST_NAME)
    }
}

impl Command for DeviceCommand {
    fn fields(&self) -> Vec<String> {
        match self {
            Self::GetAll => fields(["GETALL"]),
            Self::GetId => fields(["DEVICE", "ID", "GET"]),
            Self::SetBeeper(state) => fields(["DEVICE", "BEEPER", state.as_str()]),
            Self::SetIndicators(state) => fields(["DEVICE", "INDICATORS", state.as_str()]),
        }
    }

    fn writes(&self) -> Option<(&'static str, AttributeValue)> {
        match self {
            Self::GetAll | Self::GetId => None,
            Self::SetBeeper(state) => Some((keys::DEVICE_BEEPER, state.as_str().into())),
            Self::SetIndicators(state) => Some((keys::DEVICE_INDICATORS, state.as_str().into())),
        }
    }
}

/// Commands addressing the occupancy sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorCommand {
    /// Query whether the room is occupied.
    GetOccupancy,
}

impl Command for SensorCommand {
    fn fields(&self) -> Vec<String> {
        match self {
            Self::GetOccupancy => fields(["SNSROCC", "STATUS", "GET"]),
        }
    }
}

/// A command given as its semicolon-delimited field string.
///
/// # Examples
///
/// ```
/// use senseme_lib::command::{Command, RawCommand};
///
/// let cmd = RawCommand::new("FW;NAME;GET");
/// assert_eq!(cmd.to_wire("Fan"), "<Fan;FW;NAME;GET>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand(String);

impl RawCommand {
    /// Creates a raw command from the fields after the device name.
    #[must_use]
    pub fn new(fields: impl Into<String>) -> Self {
        Self(fields.into())
    }
}

impl Command for RawCommand {
    fn fields(&self) -> Vec<String> {
        self.0.split(';').map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getall_wire() {
        assert_eq!(DeviceCommand::GetAll.to_wire("Fan"), "<Fan;GETALL>");
    }

    #[test]
    fn identify_wire() {
        assert_eq!(DeviceCommand::identify(), "<ALL;DEVICE;ID;GET>");
    }

    #[test]
    fn beeper_and_indicators() {
        assert_eq!(
            DeviceCommand::SetBeeper(PowerState::Off).to_wire("Fan"),
            "<Fan;DEVICE;BEEPER;OFF>"
        );
        assert_eq!(
            DeviceCommand::SetIndicators(PowerState::On).writes(),
            Some((keys::DEVICE_INDICATORS, AttributeValue::scalar("ON")))
        );
    }

    #[test]
    fn occupancy_wire() {
        assert_eq!(
            SensorCommand::GetOccupancy.to_wire("Fan"),
            "<Fan;SNSROCC;STATUS;GET>"
        );
    }

    #[test]
    fn raw_command_round_trip() {
        let cmd = RawCommand::new("FAN;SPD;GET;ACTUAL");
        assert_eq!(cmd.fields(), vec!["FAN", "SPD", "GET", "ACTUAL"]);
        assert!(cmd.writes().is_none());
    }
}
