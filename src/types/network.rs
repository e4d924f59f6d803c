// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network parameters reported by a device.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::response::AttributeValue;

/// The device's IP configuration, from `NW;PARAMS;ACTUAL`.
///
/// # Examples
///
/// ```
/// use senseme_lib::response::AttributeValue;
/// use senseme_lib::types::NetworkParameters;
///
/// let value = AttributeValue::tuple(["192.168.1.50", "255.255.255.0", "192.168.1.1"]);
/// let params = NetworkParameters::from_attribute(&value).unwrap();
/// assert_eq!(params.gateway.to_string(), "192.168.1.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkParameters {
    /// Device address.
    pub ip: IpAddr,
    /// Subnet mask.
    pub subnet_mask: IpAddr,
    /// Default gateway.
    pub gateway: IpAddr,
}

impl NetworkParameters {
    /// Reads the parameters from an `(ip, mask, gateway)` tuple.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedShape` if the value is not a triple, or
    /// `ParseError::InvalidValue` if a field is not an IP address.
    pub fn from_attribute(value: &AttributeValue) -> Result<Self, ParseError> {
        let (ip, mask, gateway) = value
            .as_triple()
            .ok_or_else(|| ParseError::UnexpectedShape("NW;PARAMS;ACTUAL".to_string()))?;

        Ok(Self {
            ip: parse_ip("ip", ip)?,
            subnet_mask: parse_ip("subnet mask", mask)?,
            gateway: parse_ip("gateway", gateway)?,
        })
    }
}

fn parse_ip(field: &str, value: &str) -> Result<IpAddr, ParseError> {
    value.parse().map_err(|e| ParseError::InvalidValue {
        field: field.to_string(),
        message: format!("{value:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triple() {
        let value = AttributeValue::tuple(["10.0.0.5", "255.255.255.0", "10.0.0.1"]);
        let params = NetworkParameters::from_attribute(&value).unwrap();
        assert_eq!(params.ip.to_string(), "10.0.0.5");
        assert_eq!(params.subnet_mask.to_string(), "255.255.255.0");
    }

    #[test]
    fn rejects_scalar() {
        let result = NetworkParameters::from_attribute(&AttributeValue::scalar("10.0.0.5"));
        assert!(matches!(result, Err(ParseError::UnexpectedShape(_))));
    }

    #[test]
    fn rejects_bad_address() {
        let value = AttributeValue::tuple(["10.0.0.5", "mask", "10.0.0.1"]);
        let result = NetworkParameters::from_attribute(&value);
        assert!(matches!(result, Err(ParseError::InvalidValue { ref field, .. }) if field == "subnet mask"));
    }
}
