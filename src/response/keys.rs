// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute paths known to appear in full-state responses.
//!
//! The set of valid paths is defined by device firmware; these are the ones
//! this library reads or writes by name.

pub const FAN_POWER: &str = "FAN;PWR";
pub const FAN_SPEED: &str = "FAN;SPD;ACTUAL";
pub const FAN_SPEED_MIN: &str = "FAN;SPD;MIN";
pub const FAN_SPEED_MAX: &str = "FAN;SPD;MAX";
pub const FAN_BOOKENDS: &str = "FAN;BOOKENDS";
pub const FAN_WHOOSH: &str = "FAN;WHOOSH;STATUS";
pub const FAN_DIRECTION: &str = "FAN;DIR";
pub const FAN_MOTION: &str = "FAN;AUTO";

pub const LIGHT_POWER: &str = "LIGHT;PWR";
pub const LIGHT_LEVEL: &str = "LIGHT;LEVEL;ACTUAL";
pub const LIGHT_LEVEL_MIN: &str = "LIGHT;LEVEL;MIN";
pub const LIGHT_LEVEL_MAX: &str = "LIGHT;LEVEL;MAX";
pub const LIGHT_BOOKENDS: &str = "LIGHT;BOOKENDS";
pub const LIGHT_MOTION: &str = "LIGHT;AUTO";

pub const DEVICE_LIGHT: &str = "DEVICE;LIGHT";
pub const DEVICE_BEEPER: &str = "DEVICE;BEEPER";
pub const DEVICE_INDICATORS: &str = "DEVICE;INDICATORS";
pub const DEVICE_TIME: &str = "TIME;VALUE";
pub const FIRMWARE_NAME: &str = "FW;NAME";

pub const NETWORK_PARAMS: &str = "NW;PARAMS;ACTUAL";
pub const NETWORK_SSID: &str = "NW;SSID";
pub const NETWORK_TOKEN: &str = "NW;TOKEN";
pub const NETWORK_AP_STATUS: &str = "NW;AP;STATUS";
pub const NETWORK_DHCP: &str = "NW;DHCP";

pub const WINTERMODE_STATE: &str = "WINTERMODE;STATE";
pub const WINTERMODE_HEIGHT: &str = "WINTERMODE;HEIGHT";
pub const SMARTMODE_STATE: &str = "SMARTMODE;STATE";

pub const LEARN_MIN_SPEED: &str = "LEARN;MINSPEED";
pub const LEARN_MAX_SPEED: &str = "LEARN;MAXSPEED";
pub const LEARN_ZERO_TEMP: &str = "LEARN;ZEROTEMP";

pub const SMARTSLEEP_IDEAL_TEMP: &str = "SMARTSLEEP;IDEALTEMP";
pub const SMARTSLEEP_MIN_SPEED: &str = "SMARTSLEEP;MINSPEED";
pub const SMARTSLEEP_MAX_SPEED: &str = "SMARTSLEEP;MAXSPEED";

/// Never part of the full-state response; always queried directly.
pub const OCCUPANCY: &str = "SNSROCC;STATUS";
pub const MOTION_TIMEOUT_MIN: &str = "SNSROCC;TIMEOUT;MIN";
pub const MOTION_TIMEOUT_MAX: &str = "SNSROCC;TIMEOUT;MAX";
pub const MOTION_TIMEOUT_CURRENT: &str = "SNSROCC;TIMEOUT;CURR";
