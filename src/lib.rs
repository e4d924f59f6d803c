// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `SenseMe` Lib - A Rust library to control SenseMe (Haiku) fans and lights.
//!
//! This library provides async APIs to discover SenseMe devices on the local
//! network and control them over their plain-text TCP protocol.
//!
//! # Supported Features
//!
//! - **Discovery**: UDP broadcast, returning name, address, MAC and model
//! - **Fan control**: Power, speed and limits, whoosh, direction, motion
//! - **Light control**: Power, brightness and limits, motion
//! - **Device settings**: Beeper, indicators, winter/smart/learn/sleep modes
//! - **State queries**: Full device state as a flat map, a tree, JSON or XML
//! - **Caching**: Per-device TTL cache, optionally kept fresh by a monitor
//!
//! # Quick Start
//!
//! ## Known Device
//!
//! ```no_run
//! use senseme_lib::Device;
//! use senseme_lib::types::PowerState;
//!
//! #[tokio::main]
//! async fn main() -> senseme_lib::Result<()> {
//!     let fan = Device::builder()
//!         .with_ip("192.168.1.50".parse().unwrap())
//!         .with_name("Living Room Fan")
//!         .build()
//!         .await?;
//!
//!     fan.set_fan_power(PowerState::On).await?;
//!     fan.set_speed(3).await?;
//!
//!     if fan.light_installed().await? {
//!         fan.set_brightness(8).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Discovery
//!
//! ```no_run
//! use senseme_lib::{Device, DeviceConfig, DiscoveryOptions};
//!
//! #[tokio::main]
//! async fn main() -> senseme_lib::Result<()> {
//!     let devices = Device::discover(&DiscoveryOptions::new(), &DeviceConfig::default()).await?;
//!
//!     for device in &devices {
//!         println!("{device} at {}", device.ip());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Background Monitor
//!
//! While the monitor runs, reads are served from the cache and setters
//! update it in place:
//!
//! ```no_run
//! use senseme_lib::Device;
//!
//! #[tokio::main]
//! async fn main() -> senseme_lib::Result<()> {
//!     let fan = Device::builder().build().await?;
//!
//!     fan.refresh().await?;
//!     fan.start_monitor();
//!
//!     fan.set_speed(0).await?;
//!     let power = fan.get_attribute("FAN;PWR").await?;
//!     assert_eq!(power.as_ref().and_then(|v| v.as_str()), Some("OFF"));
//!
//!     fan.stop_monitor();
//!     Ok(())
//! }
//! ```

pub mod command;
mod config;
mod device;
pub mod discovery;
pub mod error;
pub mod monitor;
pub mod protocol;
pub mod response;
pub mod state;
pub mod types;

pub use command::Command;
pub use config::DeviceConfig;
pub use device::{Device, DeviceBuilder, DeviceIdentity};
pub use discovery::{DiscoveryOptions, discover, discover_one};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{TcpTransport, Transport};
pub use response::AttributeValue;
pub use state::StateSnapshot;
pub use types::{FanDirection, FanSpeed, LightLevel, Occupancy, PowerState, SmartMode};
