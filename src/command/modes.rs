// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Automation mode commands: winter mode, smart mode, learning, smart sleep.
//!
//! Temperatures are passed through in device units (hundredths of a degree
//! Celsius); height is in centimeters.

use crate::command::Command;
use crate::response::{AttributeValue, keys};
use crate::types::{FanSpeed, PowerState, SmartMode};

/// Commands for the fan's automation modes.
///
/// # Examples
///
/// ```
/// use senseme_lib::command::{Command, ModeCommand};
/// use senseme_lib::types::SmartMode;
///
/// let cmd = ModeCommand::SetSmartMode(SmartMode::Cooling);
/// assert_eq!(cmd.to_wire("Fan"), "<Fan;SMARTMODE;STATE;SET;COOLING>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCommand {
    /// Switch winter mode on or off.
    SetWinterMode(PowerState),
    /// Set the mounting height in centimeters.
    SetHeight(u16),
    /// Set the smart mode.
    SetSmartMode(SmartMode),
    /// Set the minimum speed used while learning.
    SetLearnMinSpeed(FanSpeed),
    /// Set the maximum speed used while learning.
    SetLearnMaxSpeed(FanSpeed),
    /// Set the temperature below which learning turns the fan off.
    SetLearnZeroTemp(u16),
    /// Set the ideal temperature for smart sleep.
    SetSmartSleepIdealTemp(u16),
    /// Set the minimum speed during smart sleep.
    SetSmartSleepMinSpeed(FanSpeed),
    /// Set the maximum speed during smart sleep.
    SetSmartSleepMaxSpeed(FanSpeed),
}

impl ModeCommand {
    fn target(&self) -> (&'static str, AttributeValue) {
        match self {
            Self::SetWinterMode(state) => (keys::WINTERMODE_STATE, state.as_str().into()),
            Self::SetHeight(cm) => (keys::WINTERMODE_HEIGHT, cm.to_string().into()),
            Self::SetSmartMode(mode) => (keys::SMARTMODE_STATE, mode.as_str().into()),
            Self::SetLearnMinSpeed(speed) => (keys::LEARN_MIN_SPEED, speed.to_string().into()),
            Self::SetLearnMaxSpeed(speed) => (keys::LEARN_MAX_SPEED, speed.to_string().into()),
            Self::SetLearnZeroTemp(temp) => (keys::LEARN_ZERO_TEMP, temp.to_string().into()),
            Self::SetSmartSleepIdealTemp(temp) => {
                (keys::SMARTSLEEP_IDEAL_TEMP, temp.to_string().into())
            }
            Self::SetSmartSleepMinSpeed(speed) => {
                (keys::SMARTSLEEP_MIN_SPEED, speed.to_string().into())
            }
            Self::SetSmartSleepMaxSpeed(speed) => {
                (keys::SMARTSLEEP_MAX_SPEED, speed.to_string().into())
            }
        }
    }
}

impl Command for ModeCommand {
    fn fields(&self) -> Vec<String> {
        let (path, value) = self.target();
        let mut out: Vec<String> = path.split(';').map(str::to_string).collect();
        // On/off switches use the state itself as the verb.
        if !matches!(self, Self::SetWinterMode(_)) {
            out.push("SET".to_string());
        }
        out.push(value.to_string());
        out
    }

    fn writes(&self) -> Option<(&'static str, AttributeValue)> {
        Some(self.target())
    }
}
