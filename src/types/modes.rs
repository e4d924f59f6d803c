// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Enumerated device settings.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Returns the wire representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_uppercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(ValueError::InvalidVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum!(
    /// Direction the fan blades spin.
    FanDirection, "fan direction", {
        /// Forward (downdraft).
        Forward => "FWD",
        /// Reverse (updraft).
        Reverse => "REV",
    }
);

wire_enum!(
    /// Smart mode of the fan.
    SmartMode, "smart mode", {
        /// Smart mode disabled.
        Off => "OFF",
        /// Learns cooling preferences.
        Cooling => "COOLING",
        /// Learns heating preferences.
        Heating => "HEATING",
    }
);

wire_enum!(
    /// Occupancy reported by the motion sensor.
    Occupancy, "occupancy", {
        /// Motion was detected within the sensor timeout.
        Occupied => "OCCUPIED",
        /// No motion within the sensor timeout.
        Unoccupied => "UNOCCUPIED",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_direction_round_trip() {
        assert_eq!(FanDirection::Forward.as_str(), "FWD");
        assert_eq!("rev".parse::<FanDirection>().unwrap(), FanDirection::Reverse);
    }

    #[test]
    fn smart_mode_rejects_unknown() {
        let err = "AUTO".parse::<SmartMode>().unwrap_err();
        assert_eq!(err.to_string(), "invalid smart mode: AUTO");
    }

    #[test]
    fn occupancy_from_wire() {
        assert_eq!("OCCUPIED".parse::<Occupancy>().unwrap(), Occupancy::Occupied);
        assert_eq!(Occupancy::Unoccupied.to_string(), "UNOCCUPIED");
    }
}
