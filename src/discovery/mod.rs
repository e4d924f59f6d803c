// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UDP device discovery.
//!
//! Discovery broadcasts `<ALL;DEVICE;ID;GET>` on the well-known port and
//! listens on that same port for announcements shaped
//! `(Name;DEVICE;ID;MAC;MODEL,SERIES)`. The sender's address becomes the
//! device IP.
//!
//! Listening stops when the timeout elapses or enough devices have
//! answered. Replies are not deduplicated: a device that answers twice is
//! listed twice.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use senseme_lib::discovery::{discover, DiscoveryOptions};
//!
//! # async fn example() -> senseme_lib::Result<()> {
//! let options = DiscoveryOptions::new()
//!     .with_max_devices(5)
//!     .with_timeout(Duration::from_secs(10));
//!
//! for identity in discover(&options).await? {
//!     println!("{identity} at {}", identity.ip());
//! }
//! # Ok(())
//! # }
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout};

use crate::command::DeviceCommand;
use crate::device::DeviceIdentity;
use crate::error::{Error, ProtocolError};
use crate::protocol::DEFAULT_PORT;

/// Marker between the device name and its details in an announcement.
const ANNOUNCEMENT_MARKER: &str = ";DEVICE;ID;";

/// Maximum datagram size read per announcement.
const DATAGRAM_SIZE: usize = 1024;

/// Options for UDP discovery.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use senseme_lib::discovery::DiscoveryOptions;
///
/// let options = DiscoveryOptions::new().with_max_devices(1);
/// assert_eq!(options.max_devices(), 1);
/// assert_eq!(options.timeout(), Duration::from_secs(5));
/// assert_eq!(options.port(), 31415);
/// ```
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    max_devices: usize,
    timeout: Duration,
    reply_timeout: Duration,
    port: u16,
    bind_address: IpAddr,
    broadcast_address: IpAddr,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_devices: 3,
            timeout: Duration::from_secs(5),
            reply_timeout: Duration::from_secs(2),
            port: DEFAULT_PORT,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            broadcast_address: IpAddr::V4(Ipv4Addr::BROADCAST),
        }
    }
}

impl DiscoveryOptions {
    /// Creates options with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many replies end discovery early.
    #[must_use]
    pub fn with_max_devices(mut self, max_devices: usize) -> Self {
        self.max_devices = max_devices;
        self
    }

    /// Sets the total listening time.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how long a single receive waits before re-checking the deadline.
    #[must_use]
    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    /// Sets the UDP port used to broadcast and listen.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the local address to listen on.
    #[must_use]
    pub fn with_bind_address(mut self, address: IpAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// Sets the address the request is sent to.
    #[must_use]
    pub fn with_broadcast_address(mut self, address: IpAddr) -> Self {
        self.broadcast_address = address;
        self
    }

    /// Returns how many replies end discovery early.
    #[must_use]
    pub fn max_devices(&self) -> usize {
        self.max_devices
    }

    /// Returns the total listening time.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the per-receive timeout.
    #[must_use]
    pub fn reply_timeout(&self) -> Duration {
        self.reply_timeout
    }

    /// Returns the UDP port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the listen address.
    #[must_use]
    pub fn bind_address(&self) -> IpAddr {
        self.bind_address
    }

    /// Returns the broadcast target address.
    #[must_use]
    pub fn broadcast_address(&self) -> IpAddr {
        self.broadcast_address
    }
}

/// Decodes one announcement into a device identity.
///
/// Returns `None` for anything that is not an announcement, including the
/// discovery request itself when it is echoed back.
///
/// # Examples
///
/// ```
/// use senseme_lib::discovery::decode_announcement;
///
/// let identity = decode_announcement(
///     "(LivingRoomFan;DEVICE;ID;AA:BB:CC:DD:EE:FF;FAN,LSERIES)",
///     "10.0.0.5".parse().unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(identity.name(), "LivingRoomFan");
/// assert_eq!(identity.mac(), "AA:BB:CC:DD:EE:FF");
/// assert_eq!(identity.model(), "FAN");
/// assert_eq!(identity.series(), "LSERIES");
/// ```
#[must_use]
pub fn decode_announcement(payload: &str, ip: IpAddr) -> Option<DeviceIdentity> {
    let body = payload.trim().strip_prefix('(')?;
    let body = &body[..body.rfind(')')?];

    let (name, details) = body.rsplit_once(ANNOUNCEMENT_MARKER)?;
    let (mac, kind) = details.rsplit_once(';')?;
    let (model, series) = kind.rsplit_once(',')?;

    if name.is_empty() {
        return None;
    }

    Some(
        DeviceIdentity::new(name, ip)
            .with_mac(mac)
            .with_model(model)
            .with_series(series),
    )
}

/// Discovers devices on the local network.
///
/// # Errors
///
/// Returns `ProtocolError::PortUnavailable` if the discovery port cannot be
/// bound, or `ProtocolError::Io` if the broadcast cannot be sent.
pub async fn discover(options: &DiscoveryOptions) -> Result<Vec<DeviceIdentity>, Error> {
    let socket = bind(options).await?;
    broadcast(&socket, options).await?;

    let deadline = Instant::now() + options.timeout;
    let mut buffer = [0u8; DATAGRAM_SIZE];
    let mut devices = Vec::new();

    while devices.len() < options.max_devices {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        let wait = options.reply_timeout.min(deadline - now);

        match timeout(wait, socket.recv_from(&mut buffer)).await {
            Ok(Ok((len, source))) => {
                let payload = String::from_utf8_lossy(&buffer[..len]);
                if let Some(identity) = decode_announcement(&payload, source.ip()) {
                    tracing::info!(
                        name = %identity.name(),
                        ip = %identity.ip(),
                        model = %identity.model(),
                        "Discovered device"
                    );
                    devices.push(identity);
                } else {
                    tracing::debug!(source = %source, payload = %payload, "Ignoring datagram");
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Discovery receive failed");
            }
            Err(_) => {
                tracing::trace!("No announcement within reply timeout");
            }
        }
    }

    tracing::info!(count = devices.len(), "Discovery finished");
    Ok(devices)
}

/// Discovers the first device that answers.
///
/// # Errors
///
/// Returns `ProtocolError::PortUnavailable` if the discovery port cannot be
/// bound, or `Error::NoResponse` if no device answers in time.
pub async fn discover_one(options: &DiscoveryOptions) -> Result<DeviceIdentity, Error> {
    let single = options.clone().with_max_devices(1);
    discover(&single)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoResponse("device discovery".to_string()))
}

async fn bind(options: &DiscoveryOptions) -> Result<UdpSocket, ProtocolError> {
    let address = SocketAddr::new(options.bind_address, options.port);
    let socket = UdpSocket::bind(address).await.map_err(|source| {
        tracing::error!(port = options.port, error = %source, "Discovery port unavailable");
        ProtocolError::PortUnavailable {
            port: options.port,
            source,
        }
    })?;
    socket.set_broadcast(true)?;
    Ok(socket)
}

async fn broadcast(socket: &UdpSocket, options: &DiscoveryOptions) -> Result<(), ProtocolError> {
    let target = SocketAddr::new(options.broadcast_address, options.port);
    let request = DeviceCommand::identify();
    tracing::debug!(target = %target, "Sending discovery broadcast");
    socket.send_to(request.as_bytes(), target).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))
    }

    #[test]
    fn default_options() {
        let options = DiscoveryOptions::default();
        assert_eq!(options.max_devices(), 3);
        assert_eq!(options.reply_timeout(), Duration::from_secs(2));
        assert_eq!(options.bind_address(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(options.broadcast_address(), IpAddr::V4(Ipv4Addr::BROADCAST));
    }

    #[test]
    fn decodes_announcement() {
        let identity =
            decode_announcement("(LivingRoomFan;DEVICE;ID;AA:BB:CC:DD:EE:FF;FAN,LSERIES)", ip())
                .unwrap();
        assert_eq!(identity.name(), "LivingRoomFan");
        assert_eq!(identity.mac(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(identity.model(), "FAN");
        assert_eq!(identity.series(), "LSERIES");
        assert_eq!(identity.ip(), ip());
    }

    #[test]
    fn decodes_name_with_spaces_and_trailing_newline() {
        let identity =
            decode_announcement("(Master Bedroom;DEVICE;ID;20:F8:5E:00:00:01;FAN,HAIKU)\r\n", ip())
                .unwrap();
        assert_eq!(identity.name(), "Master Bedroom");
        assert_eq!(identity.series(), "HAIKU");
    }

    #[test]
    fn ignores_own_request() {
        assert!(decode_announcement("<ALL;DEVICE;ID;GET>", ip()).is_none());
    }

    #[test]
    fn rejects_malformed_announcements() {
        assert!(decode_announcement("(Fan;DEVICE;ID;AA:BB)", ip()).is_none());
        assert!(decode_announcement("(Fan;FAN;PWR;ON)", ip()).is_none());
        assert!(decode_announcement("(;DEVICE;ID;AA;FAN,LSERIES)", ip()).is_none());
        assert!(decode_announcement("Fan;DEVICE;ID;AA;FAN,LSERIES", ip()).is_none());
    }
}
