// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for SenseMe device control.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off for fan, light and switchable settings
//! - [`FanSpeed`] - Fan speed step (0-7)
//! - [`LightLevel`] - Light brightness step (0-16)
//! - [`FanDirection`] - Forward/reverse blade direction
//! - [`SmartMode`] - Off/cooling/heating
//! - [`Occupancy`] - Motion sensor room state
//! - [`NetworkParameters`] - IP, subnet mask and gateway

mod level;
mod modes;
mod network;
mod power;

pub use level::{FanSpeed, LightLevel};
pub use modes::{FanDirection, Occupancy, SmartMode};
pub use network::NetworkParameters;
pub use power::PowerState;
