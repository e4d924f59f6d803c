// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for `Device` against a fake device on a local socket.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use senseme_lib::types::{FanDirection, PowerState};
use senseme_lib::{Device, DeviceConfig, Error, ProtocolError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ============================================================================
// Fake device
// ============================================================================

/// Answers single queries from a fixed table and `GETALL` with several
/// packets, recording every command it receives.
struct FakeDevice {
    port: u16,
    received: Arc<Mutex<Vec<String>>>,
}

impl FakeDevice {
    async fn start(answers: &[(&str, &str)], state: &[&str]) -> Self {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));

        let answers: Arc<HashMap<String, String>> = Arc::new(
            answers
                .iter()
                .map(|(c, r)| ((*c).to_string(), (*r).to_string()))
                .collect(),
        );
        let state: Arc<Vec<String>> = Arc::new(state.iter().map(|s| (*s).to_string()).collect());
        let log = Arc::clone(&received);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let answers = Arc::clone(&answers);
                let state = Arc::clone(&state);
                let log = Arc::clone(&log);

                tokio::spawn(async move {
                    let mut buf = [0u8; 256];
                    let Ok(n) = socket.read(&mut buf).await else {
                        return;
                    };
                    let command = String::from_utf8_lossy(&buf[..n]).into_owned();
                    log.lock().push(command.clone());

                    if command.ends_with(";GETALL>") {
                        for packet in state.iter() {
                            let _ = socket.write_all(packet.as_bytes()).await;
                            tokio::time::sleep(Duration::from_millis(20)).await;
                        }
                    } else if let Some(answer) = answers.get(&command) {
                        let _ = socket.write_all(answer.as_bytes()).await;
                    }
                    // Closing ends the client's read loop
                });
            }
        });

        Self { port, received }
    }

    fn device(&self) -> Device {
        let config = DeviceConfig::default()
            .with_port(self.port)
            .with_timeout(Duration::from_millis(300));
        Device::connect(
            senseme_lib::DeviceIdentity::new("Fan", IpAddr::V4(Ipv4Addr::LOCALHOST)),
            config,
        )
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

const STATE: &[&str] = &[
    "(Fan;FAN;PWR;ON)(Fan;FAN;SPD;ACTUAL;3)(Fan;FAN;BOOKENDS;1;7)",
    "(Fan;FAN;DIR;REV)(Fan;FAN;WHOOSH;STATUS;OFF)(Fan;NW;PARAMS;ACTUAL;10.0.0.5;",
    "255.255.255.0;10.0.0.1)(Fan;LIGHT;PWR;OFF)(Fan;DEVICE;LIGHT;PRESENT)",
];

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn queries_single_values() {
    let fake = FakeDevice::start(
        &[
            ("<Fan;FAN;PWR;GET>", "(Fan;FAN;PWR;ON)"),
            ("<Fan;FAN;SPD;GET;ACTUAL>", "(Fan;FAN;SPD;ACTUAL;5)"),
            ("<Fan;SNSROCC;STATUS;GET>", "(Fan;SNSROCC;STATUS;OCCUPIED)"),
        ],
        STATE,
    )
    .await;
    let fan = fake.device();

    assert_eq!(fan.fan_power().await.unwrap(), Some(PowerState::On));
    assert_eq!(fan.speed().await.unwrap().map(|s| s.value()), Some(5));
    let occupancy = fan.get_attribute("SNSROCC;STATUS").await.unwrap().unwrap();
    assert_eq!(occupancy.as_str(), Some("OCCUPIED"));
}

#[tokio::test]
async fn silent_device_yields_sentinel() {
    let fake = FakeDevice::start(&[], STATE).await;
    let fan = fake.device();

    assert_eq!(fan.light_power().await.unwrap(), None);
    assert_eq!(fan.get_attribute("SNSROCC;STATUS").await.unwrap(), None);
}

#[tokio::test]
async fn setters_reach_the_device() {
    let fake = FakeDevice::start(&[], STATE).await;
    let fan = fake.device();

    fan.set_speed(12).await.unwrap();
    fan.set_fan_direction(FanDirection::Forward).await.unwrap();

    // Each exchange is its own connection; give the server a moment to log
    tokio::time::sleep(Duration::from_millis(50)).await;
    let received = fake.received();
    assert!(received.contains(&"<Fan;FAN;SPD;SET;7>".to_string()));
    assert!(received.contains(&"<Fan;FAN;DIR;SET;FWD>".to_string()));
}

#[tokio::test]
async fn full_state_spans_packets() {
    let fake = FakeDevice::start(&[], STATE).await;
    let fan = fake.device();

    assert_eq!(fan.fan_direction().await.unwrap(), FanDirection::Reverse);
    assert_eq!(fan.whoosh().await.unwrap(), PowerState::Off);
    assert!(fan.light_installed().await.unwrap());

    let (low, high) = fan.fan_speed_limits().await.unwrap();
    assert_eq!((low.value(), high.value()), (1, 7));

    // Split across two packets on the wire
    let params = fan.network_parameters().await.unwrap();
    assert_eq!(params.subnet_mask.to_string(), "255.255.255.0");
    assert_eq!(params.gateway.to_string(), "10.0.0.1");

    let getall = fake
        .received()
        .iter()
        .filter(|c| c.as_str() == "<Fan;GETALL>")
        .count();
    assert_eq!(getall, 1);
}

#[tokio::test]
async fn json_export_nests_paths() {
    let fake = FakeDevice::start(&[], STATE).await;
    let fan = fake.device();

    let json: serde_json::Value = serde_json::from_str(&fan.to_json().await.unwrap()).unwrap();
    assert_eq!(json["FAN"]["SPD"]["ACTUAL"], "3");
    assert_eq!(json["FAN"]["BOOKENDS"], serde_json::json!(["1", "7"]));
    assert_eq!(
        json["NW"]["PARAMS"]["ACTUAL"],
        serde_json::json!(["10.0.0.5", "255.255.255.0", "10.0.0.1"])
    );
}

#[tokio::test]
async fn raw_command_returns_response() {
    let fake = FakeDevice::start(&[("<Fan;FW;NAME;GET>", "(Fan;FW;NAME;FW000003)")], STATE).await;
    let fan = fake.device();

    let response = fan.send_raw("FW;NAME;GET").await.unwrap();
    assert_eq!(response, "(Fan;FW;NAME;FW000003)");
}

#[tokio::test]
async fn unreachable_device_is_a_protocol_error() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let fan = Device::connect(
        senseme_lib::DeviceIdentity::new("Fan", IpAddr::V4(Ipv4Addr::LOCALHOST)),
        DeviceConfig::default().with_port(port),
    );

    let err = fan.set_fan_power(PowerState::On).await.unwrap_err();
    assert!(matches!(err, Error::Protocol(ProtocolError::Io(_))));
}
