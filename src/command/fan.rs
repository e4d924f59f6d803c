// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan control commands.

use crate::command::{Command, Reading, fields};
use crate::response::{AttributeValue, keys};
use crate::types::{FanDirection, FanSpeed, PowerState};

/// Commands addressing the `FAN` category.
///
/// # Examples
///
/// ```
/// use senseme_lib::command::{Command, FanCommand, Reading};
/// use senseme_lib::types::FanSpeed;
///
/// let query = FanCommand::GetSpeed(Reading::Actual);
/// assert_eq!(query.to_wire("Fan"), "<Fan;FAN;SPD;GET;ACTUAL>");
///
/// let limits = FanCommand::SetSpeedLimits(FanSpeed::clamped(2), FanSpeed::clamped(6));
/// assert_eq!(limits.to_wire("Fan"), "<Fan;FAN;BOOKENDS;SET;2;6>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanCommand {
    /// Query the current, minimum or maximum speed.
    GetSpeed(Reading),
    /// Set the speed.
    SetSpeed(FanSpeed),
    /// Set the room speed limits (low, high).
    SetSpeedLimits(FanSpeed, FanSpeed),
    /// Query the power state.
    GetPower,
    /// Switch the fan on or off.
    SetPower(PowerState),
    /// Switch whoosh mode on or off.
    SetWhoosh(PowerState),
    /// Set the blade direction.
    SetDirection(FanDirection),
    /// Switch the motion sensor for the fan on or off.
    SetMotion(PowerState),
}

impl Command for FanCommand {
    fn fields(&self) -> Vec<String> {
        match self {
            Self::GetSpeed(reading) => fields(["FAN", "SPD", "GET", reading.as_str()]),
            Self::SetSpeed(speed) => fields(["FAN", "SPD", "SET", &speed.to_string()]),
            Self::SetSpeedLimits(low, high) => fields([
                "FAN",
                "BOOKENDS",
                "SET",
                &low.to_string(),
                &high.to_string(),
            ]),
            Self::GetPower => fields(["FAN", "PWR", "GET"]),
            Self::SetPower(state) => fields(["FAN", "PWR", state.as_str()]),
            Self::SetWhoosh(state) => fields(["FAN", "WHOOSH", state.as_str()]),
            Self::SetDirection(direction) => fields(["FAN", "DIR", "SET", direction.as_str()]),
            Self::SetMotion(state) => fields(["FAN", "AUTO", state.as_str()]),
        }
    }

    fn writes(&self) -> Option<(&'static str, AttributeValue)> {
        match self {
            Self::GetSpeed(_) | Self::GetPower => None,
            Self::SetSpeed(speed) => Some((keys::FAN_SPEED, speed.to_string().into())),
            Self::SetSpeedLimits(low, high) => Some((
                keys::FAN_BOOKENDS,
                AttributeValue::tuple([low.to_string(), high.to_string()]),
            )),
            Self::SetPower(state) => Some((keys::FAN_POWER, state.as_str().into())),
            Self::SetWhoosh(state) => Some((keys::FAN_WHOOSH, state.as_str().into())),
            Self::SetDirection(direction) => {
                Some((keys::FAN_DIRECTION, direction.as_str().into()))
            }
            Self::SetMotion(state) => Some((keys::FAN_MOTION, state.as_str().into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_commands() {
        assert_eq!(
            FanCommand::GetSpeed(Reading::Max).to_wire("Fan"),
            "<Fan;FAN;SPD;GET;MAX>"
        );
        assert_eq!(
            FanCommand::SetSpeed(FanSpeed::clamped(9)).to_wire("Fan"),
            "<Fan;FAN;SPD;SET;7>"
        );
    }

    #[test]
    fn power_commands() {
        assert_eq!(FanCommand::GetPower.to_wire("Fan"), "<Fan;FAN;PWR;GET>");
        assert_eq!(
            FanCommand::SetPower(PowerState::Off).to_wire("Fan"),
            "<Fan;FAN;PWR;OFF>"
        );
        assert_eq!(
            FanCommand::SetWhoosh(PowerState::On).to_wire("Fan"),
            "<Fan;FAN;WHOOSH;ON>"
        );
    }

    #[test]
    fn direction_and_motion() {
        assert_eq!(
            FanCommand::SetDirection(FanDirection::Reverse).to_wire("Fan"),
            "<Fan;FAN;DIR;SET;REV>"
        );
        assert_eq!(
            FanCommand::SetMotion(PowerState::On).to_wire("Fan"),
            "<Fan;FAN;AUTO;ON>"
        );
    }

    #[test]
    fn setters_report_written_attribute() {
        assert_eq!(
            FanCommand::SetPower(PowerState::Off).writes(),
            Some((keys::FAN_POWER, AttributeValue::scalar("OFF")))
        );
        assert_eq!(
            FanCommand::SetSpeedLimits(FanSpeed::clamped(1), FanSpeed::clamped(5)).writes(),
            Some((keys::FAN_BOOKENDS, AttributeValue::tuple(["1", "5"])))
        );
        assert_eq!(FanCommand::GetPower.writes(), None);
    }
}
