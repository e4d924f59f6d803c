// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP device builder.

use std::net::IpAddr;
use std::sync::Arc;

use crate::config::DeviceConfig;
use crate::device::{Device, DeviceIdentity};
use crate::discovery::{DiscoveryOptions, discover, discover_one};
use crate::error::Error;
use crate::protocol::TcpTransport;
use crate::state::{Clock, TokioClock};

/// Builder for creating TCP-based devices.
///
/// When both the IP address and the name are given, no network access
/// happens until the first command. With only one of them, discovery runs
/// and the first reply matching it is used. With neither, the first device
/// to answer is used. A discovered device keeps its announced MAC, model
/// and series.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use senseme_lib::{Device, DeviceConfig};
///
/// # async fn example() -> senseme_lib::Result<()> {
/// // Known device
/// let fan = Device::builder()
///     .with_ip("192.168.1.50".parse().unwrap())
///     .with_name("Living Room Fan")
///     .with_config(DeviceConfig::default().with_cache_ttl(Duration::from_secs(10)))
///     .build()
///     .await?;
///
/// // Found by name
/// let bedroom = Device::builder().with_name("Bedroom").build().await?;
///
/// // Whatever answers first
/// let any = Device::builder().build().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    ip: Option<IpAddr>,
    name: Option<String>,
    mac: Option<String>,
    model: Option<String>,
    series: Option<String>,
    config: DeviceConfig,
    discovery: DiscoveryOptions,
    clock: Option<Arc<dyn Clock>>,
}

impl DeviceBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the device IP address.
    #[must_use]
    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    /// Sets the device name used to address commands.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the MAC address.
    #[must_use]
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    /// Sets the model, e.g. `FAN`.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the series, e.g. `LSERIES`.
    #[must_use]
    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    /// Sets the connection and caching configuration.
    #[must_use]
    pub fn with_config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the options used when the device has to be discovered.
    #[must_use]
    pub fn with_discovery(mut self, options: DiscoveryOptions) -> Self {
        self.discovery = options;
        self
    }

    /// Sets the clock used to age cached snapshots.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Returns the configuration that will be used.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Builds the device, discovering it first if the address or the name
    /// is missing.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The configuration is invalid
    /// - The discovery port cannot be bound
    /// - No device answers discovery, or none matches the address or name
    pub async fn build(self) -> Result<Device<TcpTransport>, Error> {
        self.config.validate()?;

        let identity = match (self.ip, self.name) {
            (Some(ip), Some(name)) => {
                let mut identity = DeviceIdentity::new(name, ip);
                if let Some(mac) = self.mac {
                    identity = identity.with_mac(mac);
                }
                if let Some(model) = self.model {
                    identity = identity.with_model(model);
                }
                if let Some(series) = self.series {
                    identity = identity.with_series(series);
                }
                identity
            }
            (ip, name) => {
                if self.mac.is_some() || self.model.is_some() || self.series.is_some() {
                    tracing::debug!("Using announced MAC, model and series of discovered device");
                }
                discover_matching(&self.discovery, ip, name.as_deref()).await?
            }
        };

        let transport = TcpTransport::new(identity.ip(), self.config.port())
            .with_timeout(self.config.timeout());
        let clock = self.clock.unwrap_or_else(|| Arc::new(TokioClock));

        tracing::debug!(device = %identity.name(), ip = %identity.ip(), "Built device");
        Ok(Device::from_transport_with_clock(
            identity,
            transport,
            self.config,
            clock,
        ))
    }
}

/// Runs discovery and returns the first reply matching `ip` and `name`,
/// or simply the first reply when neither is given.
async fn discover_matching(
    options: &DiscoveryOptions,
    ip: Option<IpAddr>,
    name: Option<&str>,
) -> Result<DeviceIdentity, Error> {
    if ip.is_none() && name.is_none() {
        tracing::info!("Address and name not given, using first device to answer");
        return discover_one(options).await;
    }

    tracing::info!(ip = ?ip, name = ?name, "Discovering device");
    discover(options)
        .await?
        .into_iter()
        .find(|found| {
            ip.is_none_or(|ip| found.ip() == ip) && name.is_none_or(|name| found.name() == name)
        })
        .ok_or_else(|| {
            tracing::warn!(ip = ?ip, name = ?name, "No discovered device matched");
            let wanted = name.map_or_else(
                || ip.map(|ip| ip.to_string()).unwrap_or_default(),
                str::to_string,
            );
            Error::NoResponse(format!("discovery of {wanted}"))
        })
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::time::Duration;

    use super::*;
    use crate::error::DeviceError;

    fn ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))
    }

    #[tokio::test]
    async fn known_device_skips_discovery() {
        let device = DeviceBuilder::new()
            .with_ip(ip())
            .with_name("Fan")
            .with_model("FAN")
            .with_series("LSERIES")
            .build()
            .await
            .unwrap();

        assert_eq!(device.name(), "Fan");
        assert_eq!(device.identity().series(), "LSERIES");
        assert_eq!(device.identity().mac(), "");
        assert_eq!(device.transport().address().port(), 31415);
    }

    #[tokio::test]
    async fn config_reaches_transport() {
        let config = DeviceConfig::default()
            .with_port(4000)
            .with_timeout(Duration::from_millis(250));
        let device = DeviceBuilder::new()
            .with_ip(ip())
            .with_name("Fan")
            .with_config(config.clone())
            .build()
            .await
            .unwrap();

        assert_eq!(device.transport().address().port(), 4000);
        assert_eq!(device.transport().timeout(), Duration::from_millis(250));
        assert_eq!(device.config(), &config);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let result = DeviceBuilder::new()
            .with_ip(ip())
            .with_name("Fan")
            .with_config(DeviceConfig::default().with_monitor_interval(Duration::ZERO))
            .build()
            .await;

        assert!(matches!(
            result,
            Err(Error::Device(DeviceError::InvalidConfiguration(_)))
        ));
    }
}
