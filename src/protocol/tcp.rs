// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP transport: one connection per exchange.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::ProtocolError;
use crate::protocol::Transport;

/// Maximum bytes taken from a single read.
const READ_BUFFER_SIZE: usize = 1048;

/// TCP transport for communicating with one SenseMe device.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use senseme_lib::protocol::{TcpTransport, Transport, DEFAULT_PORT};
///
/// # async fn example() -> senseme_lib::Result<()> {
/// let transport = TcpTransport::new("192.168.1.50".parse().unwrap(), DEFAULT_PORT)
///     .with_timeout(Duration::from_secs(3));
/// let answer = transport.request("<Fan;FAN;PWR;GET>").await?;
/// println!("{answer:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TcpTransport {
    address: SocketAddr,
    timeout: Duration,
}

impl TcpTransport {
    /// Default connect and read timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a transport for the device at `ip:port`.
    #[must_use]
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self {
            address: SocketAddr::new(ip, port),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the connect and per-read timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the device address.
    #[must_use]
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Returns the connect and per-read timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn open(&self, command: &str) -> Result<TcpStream, ProtocolError> {
        let mut stream = match tokio::time::timeout(self.timeout, TcpStream::connect(self.address))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProtocolError::Timeout {
                    address: self.address.to_string(),
                    millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
        };

        tracing::debug!(address = %self.address, command = %command, "Sending command");
        stream.write_all(command.as_bytes()).await?;
        Ok(stream)
    }

    /// Performs one bounded read. `Ok(None)` means the read timed out.
    async fn read_once(
        &self,
        stream: &mut TcpStream,
        buffer: &mut [u8],
    ) -> Result<Option<usize>, ProtocolError> {
        match tokio::time::timeout(self.timeout, stream.read(buffer)).await {
            Ok(result) => Ok(Some(result?)),
            Err(_) => Ok(None),
        }
    }
}

impl Transport for TcpTransport {
    async fn send(&self, command: &str) -> Result<(), ProtocolError> {
        let mut stream = self.open(command).await?;
        // The device closes on its own; a failed shutdown is not a failed send.
        let _ = stream.shutdown().await;
        Ok(())
    }

    async fn request(&self, command: &str) -> Result<Option<String>, ProtocolError> {
        let mut stream = self.open(command).await?;
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        match self.read_once(&mut stream, &mut buffer).await? {
            Some(0) => {
                tracing::warn!(address = %self.address, command = %command, "Connection closed without a response");
                Ok(None)
            }
            Some(n) => {
                let response = String::from_utf8_lossy(&buffer[..n]).into_owned();
                tracing::debug!(address = %self.address, response = %response, "Received response");
                Ok(Some(response))
            }
            None => {
                tracing::warn!(
                    address = %self.address,
                    command = %command,
                    timeout_ms = self.timeout.as_millis(),
                    "Socket timed out"
                );
                Ok(None)
            }
        }
    }

    async fn request_all(&self, command: &str) -> Result<String, ProtocolError> {
        let mut stream = self.open(command).await?;
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];
        let mut received = Vec::new();
        let mut fragments = 0usize;
        let mut timed_out = false;

        loop {
            match self.read_once(&mut stream, &mut buffer).await? {
                Some(0) => break,
                Some(n) => {
                    tracing::trace!(address = %self.address, bytes = n, "Received fragment");
                    received.extend_from_slice(&buffer[..n]);
                    fragments += 1;
                    timed_out = false;
                }
                // One timeout may just be a gap between packets; two in a row
                // mean the device is done.
                None if timed_out => break,
                None => timed_out = true,
            }
        }

        tracing::debug!(
            address = %self.address,
            fragments,
            bytes = received.len(),
            "Multi-read finished"
        );
        Ok(String::from_utf8_lossy(&received).into_owned())
    }
}
