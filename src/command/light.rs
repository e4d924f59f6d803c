// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light control commands.

use crate::command::{Command, Reading, fields};
use crate::response::{AttributeValue, keys};
use crate::types::{LightLevel, PowerState};

/// Commands addressing the `LIGHT` category.
///
/// # Examples
///
/// ```
/// use senseme_lib::command::{Command, LightCommand, Reading};
/// use senseme_lib::types::LightLevel;
///
/// let set = LightCommand::SetLevel(LightLevel::clamped(20));
/// assert_eq!(set.to_wire("Fan"), "<Fan;LIGHT;LEVEL;SET;16>");
///
/// let query = LightCommand::GetLevel(Reading::Min);
/// assert_eq!(query.to_wire("Fan"), "<Fan;LIGHT;LEVEL;GET;MIN>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    /// Query the current, minimum or maximum brightness.
    GetLevel(Reading),
    /// Set the brightness.
    SetLevel(LightLevel),
    /// Set the room brightness limits (low, high).
    SetLevelLimits(LightLevel, LightLevel),
    /// Query the power state.
    GetPower,
    /// Switch the light on or off.
    SetPower(PowerState),
    /// Switch the motion sensor for the light on or off.
    SetMotion(PowerState),
}

impl Command for LightCommand {
    fn fields(&self) -> Vec<String> {
        match self {
            Self::GetLevel(reading) => fields(["LIGHT", "LEVEL", "GET", reading.as_str()]),
            Self::SetLevel(level) => fields(["LIGHT", "LEVEL", "SET", &level.to_string()]),
            Self::SetLevelLimits(low, high) => fields([
                "LIGHT",
                "BOOKENDS",
                "SET",
                &low.to_string(),
                &high.to_string(),
            ]),
            Self::GetPower => fields(["LIGHT", "PWR", "GET"]),
            Self::SetPower(state) => fields(["LIGHT", "PWR", state.as_str()]),
            Self::SetMotion(state) => fields(["LIGHT", "AUTO", state.as_str()]),
        }
    }

    fn writes(&self) -> Option<(&'static str, AttributeValue)> {
        match self {
            Self::GetLevel(_) | Self::GetPower => None,
            Self::SetLevel(level) => Some((keys::LIGHT_LEVEL, level.to_string().into())),
            Self::SetLevelLimits(low, high) => Some((
                keys::LIGHT_BOOKENDS,
                AttributeValue::tuple([low.to_string(), high.to_string()]),
            )),
            Self::SetPower(state) => Some((keys::LIGHT_POWER, state.as_str().into())),
            Self::SetMotion(state) => Some((keys::LIGHT_MOTION, state.as_str().into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_commands() {
        assert_eq!(
            LightCommand::GetLevel(Reading::Actual).to_wire("Fan"),
            "<Fan;LIGHT;LEVEL;GET;ACTUAL>"
        );
        assert_eq!(
            LightCommand::SetLevel(LightLevel::clamped(-1)).to_wire("Fan"),
            "<Fan;LIGHT;LEVEL;SET;0>"
        );
    }

    #[test]
    fn power_commands() {
        assert_eq!(LightCommand::GetPower.to_wire("Fan"), "<Fan;LIGHT;PWR;GET>");
        assert_eq!(
            LightCommand::SetPower(PowerState::On).to_wire("Fan"),
            "<Fan;LIGHT;PWR;ON>"
        );
    }

    #[test]
    fn limits_command() {
        let cmd = LightCommand::SetLevelLimits(LightLevel::clamped(1), LightLevel::clamped(12));
        assert_eq!(cmd.to_wire("Fan"), "<Fan;LIGHT;BOOKENDS;SET;1;12>");
        assert_eq!(
            cmd.writes(),
            Some((keys::LIGHT_BOOKENDS, AttributeValue::tuple(["1", "12"])))
        );
    }
}
