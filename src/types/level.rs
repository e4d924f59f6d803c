// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded step values: fan speed and light level.
//!
//! Devices silently correct out-of-range requests, so setters clamp rather
//! than fail. The validating constructors exist for callers that want to
//! reject bad input themselves.

use std::fmt;

use crate::error::ValueError;

macro_rules! bounded_level {
    ($(#[$meta:meta])* $name:ident, $max:expr) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(u8);

        impl $name {
            /// Lowest step; also turns the output off.
            pub const MIN: Self = Self(0);

            /// Highest step the device accepts.
            pub const MAX: Self = Self($max);

            /// Creates a value, rejecting anything outside the valid range.
            ///
            /// # Errors
            ///
            /// Returns `ValueError::OutOfRange` if `value` is out of range.
            pub fn new(value: i32) -> Result<Self, ValueError> {
                if !(0..=i32::from($max)).contains(&value) {
                    return Err(ValueError::OutOfRange {
                        min: 0,
                        max: i32::from($max),
                        actual: value,
                    });
                }
                Ok(Self::clamped(value))
            }

            /// Creates a value, clamping to the valid range.
            #[must_use]
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            pub fn clamped(value: i32) -> Self {
                // Safe: clamped into 0..=MAX, which fits in u8
                Self(value.clamp(0, i32::from($max)) as u8)
            }

            /// Returns the numeric step.
            #[must_use]
            pub const fn value(&self) -> u8 {
                self.0
            }

            /// Returns `true` for step zero.
            #[must_use]
            pub const fn is_off(&self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = ValueError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                Self::from(value.0)
            }
        }
    };
}

bounded_level!(
    /// Fan speed step (0-7).
    ///
    /// Speed 0 also switches the fan off.
    ///
    /// # Examples
    ///
    /// ```
    /// use senseme_lib::types::FanSpeed;
    ///
    /// assert_eq!(FanSpeed::clamped(9).value(), 7);
    /// assert_eq!(FanSpeed::clamped(-3).value(), 0);
    /// assert!(FanSpeed::new(8).is_err());
    /// ```
    FanSpeed,
    7
);

bounded_level!(
    /// Light brightness step (0-16).
    ///
    /// Level 0 also switches the light off.
    ///
    /// # Examples
    ///
    /// ```
    /// use senseme_lib::types::LightLevel;
    ///
    /// assert_eq!(LightLevel::clamped(20).value(), 16);
    /// assert_eq!(LightLevel::clamped(-1).value(), 0);
    /// ```
    LightLevel,
    16
);
