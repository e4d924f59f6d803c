// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SenseMe command definitions.
//!
//! Commands are angle-bracketed, semicolon-delimited strings addressed to a
//! device by name: `<DeviceName;CATEGORY[;SUBCATEGORY...];VERB[;VALUE]>`.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Example |
//! |-------------|---------|---------|
//! | [`FanCommand`] | Fan power, speed, whoosh, direction | `<Fan;FAN;SPD;SET;5>` |
//! | [`LightCommand`] | Light power, level, motion | `<Fan;LIGHT;LEVEL;GET;ACTUAL>` |
//! | [`DeviceCommand`] | Full state, identity, beeper, LEDs | `<Fan;GETALL>` |
//! | [`ModeCommand`] | Winter/smart/learn/sleep settings | `<Fan;SMARTMODE;STATE;SET;COOLING>` |
//! | [`SensorCommand`] | Occupancy | `<Fan;SNSROCC;STATUS;GET>` |
//! | [`RawCommand`] | Anything else | `<Fan;FW;NAME;GET>` |
//!
//! # Examples
//!
//! ```
//! use senseme_lib::command::{Command, FanCommand};
//! use senseme_lib::types::FanSpeed;
//!
//! let cmd = FanCommand::SetSpeed(FanSpeed::clamped(5));
//! assert_eq!(cmd.to_wire("LivingRoomFan"), "<LivingRoomFan;FAN;SPD;SET;5>");
//! ```

mod device;
mod fan;
mod light;
mod modes;

pub use device::{DeviceCommand, RawCommand, SensorCommand};
pub use fan::FanCommand;
pub use light::LightCommand;
pub use modes::ModeCommand;

use crate::response::AttributeValue;

/// Which reading of a ranged attribute to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reading {
    /// The current value.
    Actual,
    /// The configured minimum.
    Min,
    /// The configured maximum.
    Max,
}

impl Reading {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Actual => "ACTUAL",
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }
}

/// A command that can be sent to a SenseMe device.
pub trait Command {
    /// Returns the fields following the device name.
    ///
    /// For example `["FAN", "SPD", "SET", "5"]`.
    fn fields(&self) -> Vec<String>;

    /// Returns the attribute path and value this command writes, if any.
    ///
    /// Used to patch cached state after the command succeeds.
    fn writes(&self) -> Option<(&'static str, AttributeValue)> {
        None
    }

    /// Returns the full wire string addressed to `device`.
    fn to_wire(&self, device: &str) -> String {
        format!("<{device};{}>", self.fields().join(";"))
    }
}

/// Builds an owned field list from string slices.
pub(crate) fn fields<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|p| (*p).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerState;

    #[test]
    fn wire_format() {
        let cmd = FanCommand::SetPower(PowerState::On);
        assert_eq!(cmd.to_wire("Fan"), "<Fan;FAN;PWR;ON>");
    }

    #[test]
    fn wire_format_keeps_spaces_in_name() {
        let cmd = DeviceCommand::GetAll;
        assert_eq!(cmd.to_wire("Living Room Fan"), "<Living Room Fan;GETALL>");
    }

    #[test]
    fn reading_as_str() {
        assert_eq!(Reading::Actual.as_str(), "ACTUAL");
        assert_eq!(Reading::Min.as_str(), "MIN");
        assert_eq!(Reading::Max.as_str(), "MAX");
    }
}
