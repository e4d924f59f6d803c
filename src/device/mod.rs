// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level handle for one SenseMe device.
//!
//! A [`Device`] combines an identity, a [`Transport`] and a per-device
//! [`StateCache`]. Values with a dedicated query (speed, brightness, power,
//! occupancy) are read directly from the device; everything else is read
//! from a full-state snapshot.
//!
//! # Snapshot freshness
//!
//! Without the background monitor, a snapshot is reused until its TTL
//! (measured from capture) has lapsed, then fetched again on the next read.
//! While the monitor runs, reads always use the cached snapshot and the
//! monitor keeps it current.
//!
//! After a successful setter, and only while the monitor runs, the cached
//! snapshot is patched with the written value and the values derived from
//! it (see [`StateChange`]).
//!
//! # Examples
//!
//! ```no_run
//! use senseme_lib::Device;
//! use senseme_lib::types::PowerState;
//!
//! # async fn example() -> senseme_lib::Result<()> {
//! let fan = Device::builder()
//!     .with_ip("192.168.1.50".parse().unwrap())
//!     .with_name("Living Room Fan")
//!     .build()
//!     .await?;
//!
//! fan.set_speed(4).await?;
//! fan.set_light_power(PowerState::Off).await?;
//!
//! println!("direction: {}", fan.fan_direction().await?);
//! println!("{}", fan.to_json().await?);
//! # Ok(())
//! # }
//! ```

mod builder;
mod identity;

pub use builder::DeviceBuilder;
pub use identity::DeviceIdentity;

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::{Arc, Weak};

use crate::command::{
    Command, DeviceCommand, FanCommand, LightCommand, ModeCommand, RawCommand, Reading,
    SensorCommand,
};
use crate::config::DeviceConfig;
use crate::discovery::{self, DiscoveryOptions};
use crate::error::{DeviceError, Error, ParseError};
use crate::monitor::BackgroundMonitor;
use crate::protocol::{TcpTransport, Transport};
use crate::response::{AttributeTree, AttributeValue, extract_value, keys, parse_full_state};
use crate::state::{Clock, StateCache, StateChange, StateSnapshot, TokioClock};
use crate::types::{
    FanDirection, FanSpeed, LightLevel, NetworkParameters, Occupancy, PowerState, SmartMode,
};

/// Reads of current speed and brightness are retried once when the device
/// answers with a non-numeric value such as `OFF`.
const NUMERIC_READ_ATTEMPTS: usize = 2;

/// Value of `DEVICE;LIGHT` when a light module is fitted.
const LIGHT_PRESENT: &str = "PRESENT";

/// A SenseMe fan, light or wall controller.
///
/// Cloning is cheap; clones share the cache and the monitor.
pub struct Device<T: Transport = TcpTransport> {
    inner: Arc<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    identity: DeviceIdentity,
    transport: T,
    config: DeviceConfig,
    cache: StateCache,
    monitor: BackgroundMonitor,
}

impl<T: Transport> Inner<T> {
    /// Fetches the full state and replaces the cached snapshot.
    async fn refresh(&self) -> Result<Arc<StateSnapshot>, Error> {
        let wire = DeviceCommand::GetAll.to_wire(self.identity.name());
        let response = self.transport.request_all(&wire).await?;
        if response.is_empty() {
            tracing::warn!(device = %self.identity.name(), "Full-state query returned nothing");
            return Err(Error::NoResponse(wire));
        }

        let snapshot = self.cache.replace(parse_full_state(&[response]));
        tracing::debug!(
            device = %self.identity.name(),
            attributes = snapshot.len(),
            "Refreshed device state"
        );
        Ok(snapshot)
    }
}

impl<T: Transport> Clone for Device<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport + fmt::Debug> fmt::Debug for Device<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("identity", &self.inner.identity)
            .field("transport", &self.inner.transport)
            .field("monitor_active", &self.inner.monitor.is_active())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> fmt::Display for Device<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.identity, f)
    }
}

impl Device<TcpTransport> {
    /// Creates a builder for a device reached over TCP.
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::new()
    }

    /// Discovers devices on the local network and creates a handle for each.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if `config` is invalid, or
    /// `ProtocolError::PortUnavailable` if the discovery port cannot be bound.
    pub async fn discover(
        options: &DiscoveryOptions,
        config: &DeviceConfig,
    ) -> Result<Vec<Self>, Error> {
        config.validate()?;
        let identities = discovery::discover(options).await?;
        Ok(identities
            .into_iter()
            .map(|identity| Self::connect(identity, config.clone()))
            .collect())
    }

    /// Creates a TCP handle for a known device.
    ///
    /// The configuration is not validated here; a zero monitor interval
    /// makes [`start_monitor`](Device::start_monitor) refuse to start. Use
    /// [`Device::builder`] to reject invalid settings up front.
    #[must_use]
    pub fn connect(identity: DeviceIdentity, config: DeviceConfig) -> Self {
        let transport =
            TcpTransport::new(identity.ip(), config.port()).with_timeout(config.timeout());
        Self::from_transport(identity, transport, config)
    }
}

impl<T: Transport> Device<T> {
    /// Creates a handle using the given transport.
    #[must_use]
    pub fn from_transport(identity: DeviceIdentity, transport: T, config: DeviceConfig) -> Self {
        Self::from_transport_with_clock(identity, transport, config, Arc::new(TokioClock))
    }

    /// Creates a handle using the given transport and cache clock.
    #[must_use]
    pub fn from_transport_with_clock(
        identity: DeviceIdentity,
        transport: T,
        config: DeviceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = StateCache::with_clock(config.cache_ttl(), clock);
        let monitor = BackgroundMonitor::new(config.monitor_interval());
        Self {
            inner: Arc::new(Inner {
                identity,
                transport,
                config,
                cache,
                monitor,
            }),
        }
    }

    // ========== Identity ==========

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.inner.identity
    }

    /// Returns the device name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.identity.name()
    }

    /// Returns the device IP address.
    #[must_use]
    pub fn ip(&self) -> IpAddr {
        self.inner.identity.ip()
    }

    /// Returns the device configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    // ========== Raw exchange ==========

    /// Sends a command and applies write-through for what it writes.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn send<C: Command + Sync>(&self, command: &C) -> Result<(), Error> {
        let wire = command.to_wire(self.name());
        self.inner.transport.send(&wire).await?;

        if let Some((path, value)) = command.writes() {
            self.write_through(path, value);
        }
        Ok(())
    }

    /// Sends a query and returns the last field of the response.
    ///
    /// Returns `Ok(None)` if the device did not answer in time or the answer
    /// was malformed.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the connection fails.
    pub async fn query<C: Command + Sync>(&self, command: &C) -> Result<Option<String>, Error> {
        let wire = command.to_wire(self.name());
        let Some(response) = self.inner.transport.request(&wire).await? else {
            return Ok(None);
        };

        let value = extract_value(&response);
        if value.is_none() {
            tracing::warn!(
                device = %self.name(),
                command = %wire,
                response = %response,
                "Malformed response"
            );
        }
        Ok(value)
    }

    /// Sends raw fields (everything after the device name) and returns
    /// everything the device sends until it goes quiet.
    ///
    /// An empty string means the device did not answer.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the connection fails.
    pub async fn send_raw(&self, fields: &str) -> Result<String, Error> {
        let wire = RawCommand::new(fields).to_wire(self.name());
        Ok(self.inner.transport.request_all(&wire).await?)
    }

    // ========== State ==========

    /// Returns the current full-state snapshot, fetching one if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoResponse` if a fetch was needed and the device sent
    /// nothing, or `ProtocolError` if the connection fails.
    pub async fn snapshot(&self) -> Result<Arc<StateSnapshot>, Error> {
        if self.inner.monitor.is_active()
            && let Some(snapshot) = self.inner.cache.get()
        {
            return Ok(snapshot);
        }

        if let Some(snapshot) = self.inner.cache.fresh() {
            tracing::trace!(device = %self.name(), "Using cached state");
            return Ok(snapshot);
        }

        self.inner.refresh().await
    }

    /// Fetches the full state now, regardless of the cache.
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot).
    pub async fn refresh(&self) -> Result<Arc<StateSnapshot>, Error> {
        self.inner.refresh().await
    }

    /// Returns the cached snapshot without touching the network.
    #[must_use]
    pub fn cached_snapshot(&self) -> Option<Arc<StateSnapshot>> {
        self.inner.cache.get()
    }

    /// Returns the value of one attribute path, e.g. `NW;PARAMS;ACTUAL`.
    ///
    /// Occupancy (`SNSROCC;STATUS`) is never part of the full state and is
    /// always queried directly; `Ok(None)` means that query went unanswered
    /// or the answer was malformed. Every other path is read from the
    /// snapshot and is always `Some`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the path is not in the device
    /// state.
    pub async fn get_attribute(&self, path: &str) -> Result<Option<AttributeValue>, Error> {
        if path == keys::OCCUPANCY {
            return Ok(self
                .query(&SensorCommand::GetOccupancy)
                .await?
                .map(AttributeValue::Scalar));
        }

        self.snapshot_attribute(path).await.map(Some)
    }

    /// Reads one path from the snapshot.
    async fn snapshot_attribute(&self, path: &str) -> Result<AttributeValue, Error> {
        self.snapshot()
            .await?
            .get(path)
            .cloned()
            .ok_or_else(|| Error::UnknownAttribute(path.to_string()))
    }

    /// Returns the full state as a flat path-to-value mapping.
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot).
    pub async fn flat_state(&self) -> Result<BTreeMap<String, AttributeValue>, Error> {
        Ok(self.snapshot().await?.attributes().clone())
    }

    /// Returns the full state nested by path segment.
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot).
    pub async fn nested_state(&self) -> Result<AttributeTree, Error> {
        Ok(self.snapshot().await?.tree())
    }

    /// Returns the nested state as a JSON document.
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot), or `ParseError::Export`.
    pub async fn to_json(&self) -> Result<String, Error> {
        Ok(self.snapshot().await?.to_json()?)
    }

    /// Returns the nested state as an XML document.
    ///
    /// # Errors
    ///
    /// Same as [`snapshot`](Self::snapshot), or `ParseError::Export`.
    pub async fn to_xml(&self) -> Result<String, Error> {
        Ok(self.snapshot().await?.to_xml()?)
    }

    // ========== Monitor ==========

    /// Starts refreshing the snapshot in the background.
    ///
    /// Returns `false` if the monitor was already running or the configured
    /// interval is zero. Must be called within a tokio runtime.
    pub fn start_monitor(&self) -> bool {
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        self.inner.monitor.start(move || {
            let weak = Weak::clone(&weak);
            async move {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Err(e) = inner.refresh().await {
                    tracing::warn!(
                        device = %inner.identity.name(),
                        error = %e,
                        "Background refresh failed"
                    );
                }
            }
        })
    }

    /// Stops the background monitor after its current cycle.
    ///
    /// The cached snapshot is kept. Returns `false` if it was not running.
    pub fn stop_monitor(&self) -> bool {
        self.inner.monitor.stop()
    }

    /// Returns `true` while the background monitor runs.
    #[must_use]
    pub fn monitor_active(&self) -> bool {
        self.inner.monitor.is_active()
    }

    // ========== Fan ==========

    /// Returns the current fan speed.
    ///
    /// Returns `Ok(None)` if the device did not answer.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the device answers twice with
    /// something other than a number.
    pub async fn speed(&self) -> Result<Option<FanSpeed>, Error> {
        let command = FanCommand::GetSpeed(Reading::Actual);
        self.read_level(&command, keys::FAN_SPEED, NUMERIC_READ_ATTEMPTS)
            .await?
            .map(FanSpeed::new)
            .transpose()
            .map_err(Error::from)
    }

    /// Returns the lowest speed the fan will run at.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for a non-numeric answer.
    pub async fn min_speed(&self) -> Result<Option<FanSpeed>, Error> {
        let command = FanCommand::GetSpeed(Reading::Min);
        self.read_level(&command, keys::FAN_SPEED_MIN, 1)
            .await?
            .map(FanSpeed::new)
            .transpose()
            .map_err(Error::from)
    }

    /// Returns the highest speed the fan will run at.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for a non-numeric answer.
    pub async fn max_speed(&self) -> Result<Option<FanSpeed>, Error> {
        let command = FanCommand::GetSpeed(Reading::Max);
        self.read_level(&command, keys::FAN_SPEED_MAX, 1)
            .await?
            .map(FanSpeed::new)
            .transpose()
            .map_err(Error::from)
    }

    /// Sets the fan speed, clamped to 0-7. Speed 0 switches the fan off.
    ///
    /// Returns the speed actually sent.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_speed(&self, speed: i32) -> Result<FanSpeed, Error> {
        let clamped = FanSpeed::clamped(speed);
        if i32::from(clamped.value()) != speed {
            tracing::debug!(requested = speed, sent = %clamped, "Clamped fan speed");
        }
        self.send(&FanCommand::SetSpeed(clamped)).await?;
        Ok(clamped)
    }

    /// Raises the fan speed by `step`, clamped.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoResponse` if the current speed cannot be read.
    pub async fn increase_speed(&self, step: i32) -> Result<FanSpeed, Error> {
        let current = self.speed().await?.ok_or_else(|| no_response(keys::FAN_SPEED))?;
        self.set_speed(i32::from(current.value()).saturating_add(step))
            .await
    }

    /// Lowers the fan speed by `step`, clamped.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoResponse` if the current speed cannot be read.
    pub async fn decrease_speed(&self, step: i32) -> Result<FanSpeed, Error> {
        self.increase_speed(step.saturating_neg()).await
    }

    /// Returns the room speed limits (low, high) from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report them.
    pub async fn fan_speed_limits(&self) -> Result<(FanSpeed, FanSpeed), Error> {
        let (low, high) = self.attribute_pair(keys::FAN_BOOKENDS).await?;
        Ok((FanSpeed::new(low)?, FanSpeed::new(high)?))
    }

    /// Sets the room speed limits. Both ends are clamped and ordered.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_fan_speed_limits(
        &self,
        low: i32,
        high: i32,
    ) -> Result<(FanSpeed, FanSpeed), Error> {
        let (low, high) = ordered(FanSpeed::clamped(low), FanSpeed::clamped(high));
        self.send(&FanCommand::SetSpeedLimits(low, high)).await?;
        Ok((low, high))
    }

    /// Returns the fan power state.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the answer is not `ON` or `OFF`.
    pub async fn fan_power(&self) -> Result<Option<PowerState>, Error> {
        self.query_parsed(&FanCommand::GetPower).await
    }

    /// Switches the fan on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_fan_power(&self, state: PowerState) -> Result<(), Error> {
        self.send(&FanCommand::SetPower(state)).await
    }

    /// Toggles the fan power and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoResponse` if the current state cannot be read.
    pub async fn toggle_fan(&self) -> Result<PowerState, Error> {
        let current = self
            .fan_power()
            .await?
            .ok_or_else(|| no_response(keys::FAN_POWER))?;
        let next = current.toggled();
        self.set_fan_power(next).await?;
        Ok(next)
    }

    /// Returns whether whoosh mode is on.
    ///
    /// There is no dedicated query, so this reads the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::MissingAttribute` if the snapshot lacks the
    /// whoosh status, which a responsive fan always reports.
    pub async fn whoosh(&self) -> Result<PowerState, Error> {
        let snapshot = self.snapshot().await?;
        let value = snapshot
            .get(keys::FAN_WHOOSH)
            .ok_or_else(|| DeviceError::missing(keys::FAN_WHOOSH))?;
        parse_value(keys::FAN_WHOOSH, value)
    }

    /// Switches whoosh mode on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_whoosh(&self, state: PowerState) -> Result<(), Error> {
        self.send(&FanCommand::SetWhoosh(state)).await
    }

    /// Returns the blade direction.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn fan_direction(&self) -> Result<FanDirection, Error> {
        self.attribute(keys::FAN_DIRECTION).await
    }

    /// Sets the blade direction.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_fan_direction(&self, direction: FanDirection) -> Result<(), Error> {
        self.send(&FanCommand::SetDirection(direction)).await
    }

    /// Returns whether the fan follows the motion sensor.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn fan_motion(&self) -> Result<PowerState, Error> {
        self.attribute(keys::FAN_MOTION).await
    }

    /// Switches motion control for the fan on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_fan_motion(&self, state: PowerState) -> Result<(), Error> {
        self.send(&FanCommand::SetMotion(state)).await
    }

    // ========== Light ==========

    /// Returns the current brightness.
    ///
    /// Returns `Ok(None)` if the device did not answer.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the device answers twice with
    /// something other than a number.
    pub async fn brightness(&self) -> Result<Option<LightLevel>, Error> {
        let command = LightCommand::GetLevel(Reading::Actual);
        self.read_level(&command, keys::LIGHT_LEVEL, NUMERIC_READ_ATTEMPTS)
            .await?
            .map(LightLevel::new)
            .transpose()
            .map_err(Error::from)
    }

    /// Returns the lowest brightness the light will use.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for a non-numeric answer.
    pub async fn min_brightness(&self) -> Result<Option<LightLevel>, Error> {
        let command = LightCommand::GetLevel(Reading::Min);
        self.read_level(&command, keys::LIGHT_LEVEL_MIN, 1)
            .await?
            .map(LightLevel::new)
            .transpose()
            .map_err(Error::from)
    }

    /// Returns the highest brightness the light will use.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` for a non-numeric answer.
    pub async fn max_brightness(&self) -> Result<Option<LightLevel>, Error> {
        let command = LightCommand::GetLevel(Reading::Max);
        self.read_level(&command, keys::LIGHT_LEVEL_MAX, 1)
            .await?
            .map(LightLevel::new)
            .transpose()
            .map_err(Error::from)
    }

    /// Sets the brightness, clamped to 0-16. Level 0 switches the light off.
    ///
    /// Returns the level actually sent.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_brightness(&self, level: i32) -> Result<LightLevel, Error> {
        let clamped = LightLevel::clamped(level);
        if i32::from(clamped.value()) != level {
            tracing::debug!(requested = level, sent = %clamped, "Clamped brightness");
        }
        self.send(&LightCommand::SetLevel(clamped)).await?;
        Ok(clamped)
    }

    /// Raises the brightness by `step`, clamped.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoResponse` if the current brightness cannot be read.
    pub async fn increase_brightness(&self, step: i32) -> Result<LightLevel, Error> {
        let current = self
            .brightness()
            .await?
            .ok_or_else(|| no_response(keys::LIGHT_LEVEL))?;
        self.set_brightness(i32::from(current.value()).saturating_add(step))
            .await
    }

    /// Lowers the brightness by `step`, clamped.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoResponse` if the current brightness cannot be read.
    pub async fn decrease_brightness(&self, step: i32) -> Result<LightLevel, Error> {
        self.increase_brightness(step.saturating_neg()).await
    }

    /// Returns the room brightness limits (low, high) from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report them.
    pub async fn brightness_limits(&self) -> Result<(LightLevel, LightLevel), Error> {
        let (low, high) = self.attribute_pair(keys::LIGHT_BOOKENDS).await?;
        Ok((LightLevel::new(low)?, LightLevel::new(high)?))
    }

    /// Sets the room brightness limits. Both ends are clamped and ordered.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_brightness_limits(
        &self,
        low: i32,
        high: i32,
    ) -> Result<(LightLevel, LightLevel), Error> {
        let (low, high) = ordered(LightLevel::clamped(low), LightLevel::clamped(high));
        self.send(&LightCommand::SetLevelLimits(low, high)).await?;
        Ok((low, high))
    }

    /// Returns the light power state.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the answer is not `ON` or `OFF`.
    pub async fn light_power(&self) -> Result<Option<PowerState>, Error> {
        self.query_parsed(&LightCommand::GetPower).await
    }

    /// Switches the light on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_light_power(&self, state: PowerState) -> Result<(), Error> {
        self.send(&LightCommand::SetPower(state)).await
    }

    /// Toggles the light power and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoResponse` if the current state cannot be read.
    pub async fn toggle_light(&self) -> Result<PowerState, Error> {
        let current = self
            .light_power()
            .await?
            .ok_or_else(|| no_response(keys::LIGHT_POWER))?;
        let next = current.toggled();
        self.set_light_power(next).await?;
        Ok(next)
    }

    /// Returns whether the light follows the motion sensor.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn light_motion(&self) -> Result<PowerState, Error> {
        self.attribute(keys::LIGHT_MOTION).await
    }

    /// Switches motion control for the light on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_light_motion(&self, state: PowerState) -> Result<(), Error> {
        self.send(&LightCommand::SetMotion(state)).await
    }

    /// Returns `true` if a light module is fitted.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn light_installed(&self) -> Result<bool, Error> {
        Ok(self.attribute_string(keys::DEVICE_LIGHT).await? == LIGHT_PRESENT)
    }

    // ========== Device ==========

    /// Returns whether the beeper is on.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn beeper(&self) -> Result<PowerState, Error> {
        self.attribute(keys::DEVICE_BEEPER).await
    }

    /// Switches the beeper on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_beeper(&self, state: PowerState) -> Result<(), Error> {
        self.send(&DeviceCommand::SetBeeper(state)).await
    }

    /// Returns whether the indicator LEDs are on.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn indicators(&self) -> Result<PowerState, Error> {
        self.attribute(keys::DEVICE_INDICATORS).await
    }

    /// Switches the indicator LEDs on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_indicators(&self, state: PowerState) -> Result<(), Error> {
        self.send(&DeviceCommand::SetIndicators(state)).await
    }

    /// Returns the device clock as reported.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn device_time(&self) -> Result<String, Error> {
        self.attribute_string(keys::DEVICE_TIME).await
    }

    /// Returns the firmware name.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn firmware_name(&self) -> Result<String, Error> {
        self.attribute_string(keys::FIRMWARE_NAME).await
    }

    // ========== Network ==========

    /// Returns the IP address, subnet mask and gateway.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report them,
    /// or `ParseError` if they are not addresses.
    pub async fn network_parameters(&self) -> Result<NetworkParameters, Error> {
        let value = self.snapshot_attribute(keys::NETWORK_PARAMS).await?;
        Ok(NetworkParameters::from_attribute(&value)?)
    }

    /// Returns the Wi-Fi network name.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn ssid(&self) -> Result<String, Error> {
        self.attribute_string(keys::NETWORK_SSID).await
    }

    /// Returns the network token.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn token(&self) -> Result<String, Error> {
        self.attribute_string(keys::NETWORK_TOKEN).await
    }

    /// Returns the access point status.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn access_point(&self) -> Result<String, Error> {
        self.attribute_string(keys::NETWORK_AP_STATUS).await
    }

    /// Returns the DHCP setting.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn dhcp(&self) -> Result<String, Error> {
        self.attribute_string(keys::NETWORK_DHCP).await
    }

    // ========== Modes ==========

    /// Returns whether winter mode is on.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn wintermode(&self) -> Result<PowerState, Error> {
        self.attribute(keys::WINTERMODE_STATE).await
    }

    /// Switches winter mode on or off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_wintermode(&self, state: PowerState) -> Result<(), Error> {
        self.send(&ModeCommand::SetWinterMode(state)).await
    }

    /// Returns the mounting height in centimeters.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn height(&self) -> Result<u16, Error> {
        self.attribute(keys::WINTERMODE_HEIGHT).await
    }

    /// Sets the mounting height in centimeters.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_height(&self, centimeters: u16) -> Result<(), Error> {
        self.send(&ModeCommand::SetHeight(centimeters)).await
    }

    /// Returns the smart mode.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn smart_mode(&self) -> Result<SmartMode, Error> {
        self.attribute(keys::SMARTMODE_STATE).await
    }

    /// Sets the smart mode.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_smart_mode(&self, mode: SmartMode) -> Result<(), Error> {
        self.send(&ModeCommand::SetSmartMode(mode)).await
    }

    /// Returns the minimum speed used while learning.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn learn_min_speed(&self) -> Result<FanSpeed, Error> {
        self.speed_attribute(keys::LEARN_MIN_SPEED).await
    }

    /// Sets the minimum speed used while learning, clamped.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_learn_min_speed(&self, speed: i32) -> Result<FanSpeed, Error> {
        let speed = FanSpeed::clamped(speed);
        self.send(&ModeCommand::SetLearnMinSpeed(speed)).await?;
        Ok(speed)
    }

    /// Returns the maximum speed used while learning.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn learn_max_speed(&self) -> Result<FanSpeed, Error> {
        self.speed_attribute(keys::LEARN_MAX_SPEED).await
    }

    /// Sets the maximum speed used while learning, clamped.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_learn_max_speed(&self, speed: i32) -> Result<FanSpeed, Error> {
        let speed = FanSpeed::clamped(speed);
        self.send(&ModeCommand::SetLearnMaxSpeed(speed)).await?;
        Ok(speed)
    }

    /// Returns the temperature below which learning switches the fan off,
    /// in hundredths of a degree Celsius.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn learn_zero_temp(&self) -> Result<u16, Error> {
        self.attribute(keys::LEARN_ZERO_TEMP).await
    }

    /// Sets the learning cut-off temperature in hundredths of a degree.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_learn_zero_temp(&self, temperature: u16) -> Result<(), Error> {
        self.send(&ModeCommand::SetLearnZeroTemp(temperature)).await
    }

    /// Returns the smart sleep ideal temperature in hundredths of a degree.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn smartsleep_ideal_temp(&self) -> Result<u16, Error> {
        self.attribute(keys::SMARTSLEEP_IDEAL_TEMP).await
    }

    /// Sets the smart sleep ideal temperature in hundredths of a degree.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_smartsleep_ideal_temp(&self, temperature: u16) -> Result<(), Error> {
        self.send(&ModeCommand::SetSmartSleepIdealTemp(temperature))
            .await
    }

    /// Returns the minimum speed during smart sleep.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn smartsleep_min_speed(&self) -> Result<FanSpeed, Error> {
        self.speed_attribute(keys::SMARTSLEEP_MIN_SPEED).await
    }

    /// Sets the minimum speed during smart sleep, clamped.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_smartsleep_min_speed(&self, speed: i32) -> Result<FanSpeed, Error> {
        let speed = FanSpeed::clamped(speed);
        self.send(&ModeCommand::SetSmartSleepMinSpeed(speed)).await?;
        Ok(speed)
    }

    /// Returns the maximum speed during smart sleep.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn smartsleep_max_speed(&self) -> Result<FanSpeed, Error> {
        self.speed_attribute(keys::SMARTSLEEP_MAX_SPEED).await
    }

    /// Sets the maximum speed during smart sleep, clamped.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command cannot be delivered.
    pub async fn set_smartsleep_max_speed(&self, speed: i32) -> Result<FanSpeed, Error> {
        let speed = FanSpeed::clamped(speed);
        self.send(&ModeCommand::SetSmartSleepMaxSpeed(speed)).await?;
        Ok(speed)
    }

    // ========== Sensor ==========

    /// Returns whether the room is occupied, always queried directly.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` for an unrecognized answer.
    pub async fn occupancy(&self) -> Result<Option<Occupancy>, Error> {
        self.query_parsed(&SensorCommand::GetOccupancy).await
    }

    /// Returns the shortest motion timeout the sensor accepts.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn motion_timer_min(&self) -> Result<u32, Error> {
        self.attribute(keys::MOTION_TIMEOUT_MIN).await
    }

    /// Returns the longest motion timeout the sensor accepts.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn motion_timer_max(&self) -> Result<u32, Error> {
        self.attribute(keys::MOTION_TIMEOUT_MAX).await
    }

    /// Returns the current motion timeout.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownAttribute` if the device does not report it.
    pub async fn motion_timer_current(&self) -> Result<u32, Error> {
        self.attribute(keys::MOTION_TIMEOUT_CURRENT).await
    }

    // ========== Helpers ==========

    fn write_through(&self, path: &'static str, value: AttributeValue) {
        if !self.inner.monitor.is_active() {
            return;
        }
        let change = StateChange::write_through(path, value);
        if self.inner.cache.patch(&change) {
            tracing::debug!(device = %self.name(), attribute = path, "Patched cached state");
        }
    }

    /// Queries a numeric level, retrying non-numeric answers.
    async fn read_level<C: Command + Sync>(
        &self,
        command: &C,
        field: &str,
        attempts: usize,
    ) -> Result<Option<i32>, Error> {
        let mut last = String::new();
        for attempt in 1..=attempts {
            let Some(value) = self.query(command).await? else {
                return Ok(None);
            };
            if let Ok(level) = value.trim().parse::<i32>() {
                return Ok(Some(level));
            }
            tracing::debug!(
                device = %self.name(),
                attribute = field,
                attempt,
                value = %value,
                "Non-numeric reading"
            );
            last = value;
        }

        Err(ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a number, got {last:?}"),
        }
        .into())
    }

    async fn query_parsed<C, V>(&self, command: &C) -> Result<Option<V>, Error>
    where
        C: Command + Sync,
        V: FromStr<Err = crate::error::ValueError>,
    {
        Ok(self.query(command).await?.map(|v| v.parse()).transpose()?)
    }

    async fn attribute_string(&self, path: &str) -> Result<String, Error> {
        let value = self.snapshot_attribute(path).await?;
        Ok(value.expect_scalar(path)?.to_string())
    }

    async fn attribute<V>(&self, path: &str) -> Result<V, Error>
    where
        V: FromStr,
        V::Err: fmt::Display,
    {
        let value = self.snapshot_attribute(path).await?;
        parse_value(path, &value)
    }

    async fn speed_attribute(&self, path: &str) -> Result<FanSpeed, Error> {
        Ok(FanSpeed::new(self.attribute(path).await?)?)
    }

    async fn attribute_pair(&self, path: &str) -> Result<(i32, i32), Error> {
        let value = self.snapshot_attribute(path).await?;
        let (low, high) = value
            .as_pair()
            .ok_or_else(|| ParseError::UnexpectedShape(path.to_string()))?;
        Ok((parse_str(path, low)?, parse_str(path, high)?))
    }
}

fn parse_value<V>(path: &str, value: &AttributeValue) -> Result<V, Error>
where
    V: FromStr,
    V::Err: fmt::Display,
{
    parse_str(path, value.expect_scalar(path)?)
}

fn parse_str<V>(path: &str, value: &str) -> Result<V, Error>
where
    V: FromStr,
    V::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: V::Err| {
        Error::Parse(ParseError::InvalidValue {
            field: path.to_string(),
            message: format!("{value:?}: {e}"),
        })
    })
}

fn ordered<L: Ord>(a: L, b: L) -> (L, L) {
    if a <= b { (a, b) } else { (b, a) }
}

fn no_response(path: &str) -> Error {
    Error::NoResponse(path.to_string())
}
