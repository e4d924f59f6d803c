// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `senseme_lib` library.
//!
//! Timeouts and malformed single-value responses are deliberately *not*
//! errors: the transport reports them as `Ok(None)`. Everything here is
//! something a caller has to react to: an unbindable discovery port, an
//! attribute missing from the device state, or a value that cannot be
//! interpreted.

use std::io;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while interpreting a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device answered, but not the way a healthy device does.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// The requested attribute is not part of the device state.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The device sent nothing back for a command that needs an answer.
    #[error("no response from device for {0}")]
    NoResponse(String),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i32,
        /// Maximum allowed value.
        max: i32,
        /// The actual value that was provided.
        actual: i32,
    },

    /// A string does not name a known variant of an enumerated setting.
    #[error("invalid {kind}: {value}")]
    InvalidVariant {
        /// The setting being parsed, e.g. `power state`.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Errors related to socket communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Opening, writing or reading a socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Connecting to the device did not complete in time.
    #[error("connection to {address} timed out after {millis} ms")]
    Timeout {
        /// The address that was being connected to.
        address: String,
        /// The configured timeout in milliseconds.
        millis: u64,
    },

    /// The discovery port could not be bound locally.
    #[error("port {port} is in use or could not be opened")]
    PortUnavailable {
        /// The UDP port that could not be bound.
        port: u16,
        /// The underlying bind failure.
        #[source]
        source: io::Error,
    },
}

/// Errors related to interpreting device values.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A value could not be converted to the expected type.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The attribute or command the value belongs to.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },

    /// An attribute has a different shape than expected.
    #[error("attribute {0} has an unexpected shape")]
    UnexpectedShape(String),

    /// Export to a hierarchical document failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Errors raised when a device misbehaves.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// An attribute that a healthy device always reports is missing from the
    /// full-state response; the device is assumed unreachable or misbehaving.
    #[error("attribute {attribute} missing from device state")]
    MissingAttribute {
        /// The attribute path that was expected.
        attribute: String,
        /// I/O-style cause, always of kind [`io::ErrorKind::NotFound`].
        #[source]
        source: io::Error,
    },

    /// Device configuration is invalid.
    #[error("invalid device configuration: {0}")]
    InvalidConfiguration(String),
}

impl DeviceError {
    /// Creates a [`DeviceError::MissingAttribute`] for the given path.
    #[must_use]
    pub fn missing(attribute: &str) -> Self {
        Self::MissingAttribute {
            attribute: attribute.to_string(),
            source: io::Error::new(
                io::ErrorKind::NotFound,
                format!("device did not report {attribute}"),
            ),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 7,
            actual: 9,
        };
        assert_eq!(err.to_string(), "value 9 is out of range [0, 7]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidVariant {
            kind: "power state",
            value: "MAYBE".to_string(),
        };
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidVariant { .. })));
    }

    #[test]
    fn port_unavailable_display() {
        let err = ProtocolError::PortUnavailable {
            port: 31415,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert_eq!(err.to_string(), "port 31415 is in use or could not be opened");
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_attribute_is_io_not_found() {
        let err = DeviceError::missing("FAN;WHOOSH;STATUS");
        assert_eq!(
            err.to_string(),
            "attribute FAN;WHOOSH;STATUS missing from device state"
        );
        let source = err
            .source()
            .and_then(|s| s.downcast_ref::<io::Error>())
            .unwrap();
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn unknown_attribute_display() {
        let err = Error::UnknownAttribute("FOO;BAR".to_string());
        assert_eq!(err.to_string(), "unknown attribute: FOO;BAR");
    }
}
