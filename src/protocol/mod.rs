// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport for exchanging protocol messages with a device.
//!
//! Every exchange opens its own connection. Three patterns exist:
//!
//! - [`Transport::send`]: fire-and-forget; nothing is read back.
//! - [`Transport::request`]: one bounded read. A read timeout is not an
//!   error: it yields `Ok(None)`, the failure sentinel.
//! - [`Transport::request_all`]: reads until two consecutive timeouts and
//!   returns everything received as one string. Used for the full-state
//!   query, which some devices answer with several back-to-back packets.
//!
//! [`TcpTransport`] is the implementation used against real devices.

mod tcp;

pub use tcp::TcpTransport;

use std::future::Future;

use crate::error::ProtocolError;

/// Well-known port for both TCP commands and UDP discovery.
pub const DEFAULT_PORT: u16 = 31415;

/// Trait for transports that carry wire strings to one device.
pub trait Transport: Send + Sync + 'static {
    /// Sends a command without reading a response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the connection cannot be opened or written.
    fn send(&self, command: &str) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Sends a command and reads one response.
    ///
    /// Returns `Ok(None)` if nothing arrives within the read timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the connection cannot be opened or used.
    fn request(
        &self,
        command: &str,
    ) -> impl Future<Output = Result<Option<String>, ProtocolError>> + Send;

    /// Sends a command and reads until two consecutive read timeouts or the
    /// connection closes.
    ///
    /// The received bytes are decoded once, so a character split across
    /// packets survives. Returns an empty string if nothing arrived.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the connection cannot be opened or used.
    fn request_all(&self, command: &str)
    -> impl Future<Output = Result<String, ProtocolError>> + Send;
}
