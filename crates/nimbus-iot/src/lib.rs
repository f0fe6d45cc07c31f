// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! # Nimbus IoT - Cloud Hub Device Protocol
//!
//! The device-side protocol engine for a cloud IoT hub over an MQTT
//! publish/subscribe transport: topic builders and parsers for telemetry,
//! cloud-to-device messages, direct methods and twin properties, plus
//! shared-access-signature credential assembly.
//!
//! The crate owns no sockets and performs no I/O: every function formats
//! into or parses out of caller-provided byte buffers. Pair it with any
//! MQTT stack.
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------+
//! |  Application                            |
//! +-----------------------------------------+
//!      v publish topics        ^ received topics
//! +-----------------------------------------+
//! |  client | telemetry | c2d | methods |   |
//! |  twin | properties | message | sas      |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  nimbus-core (span, JSON engines)       |
//! +-----------------------------------------+
//! ```
//!
//! ## Example
//!
//! ```
//! use nimbus_iot::client::HubClient;
//!
//! let client = HubClient::new("myhub.example.net", "my_device", None).unwrap();
//! let mut topic = [0u8; 128];
//! let topic = nimbus_iot::telemetry::publish_topic(&client, None, &mut topic).unwrap();
//! assert_eq!(topic, "devices/my_device/messages/events/");
//! ```
//!
//! ## Feature Flags
//!
//! - `std` -- enable `std::error::Error` impls and host testing (default)
//! - `crypto` -- HMAC-SHA256 + Base64 SAS signing helper

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Cloud-to-device message topics
pub mod c2d;
/// Immutable hub connection state and MQTT identity formatters
pub mod client;
/// Direct-method topics
pub mod methods;
/// Ordered `k=v&k=v` message property bag
pub mod message;
/// Component-aware twin property framing and iteration
pub mod properties;
/// Shared-access-signature credentials
pub mod sas;
/// Service status codes carried in response topics
pub mod status;
/// Telemetry publish topics
pub mod telemetry;
/// Twin document topics
pub mod twin;

mod topic;

// Re-exports for convenience
pub use crate::client::{HubClient, HubClientOptions};
pub use crate::status::Status;
pub use nimbus_core::error::{Error, Result};

/// Service API version advertised in the MQTT user name.
pub const API_VERSION: &str = "2020-09-30";

/// Default user agent appended to the MQTT user name.
pub const DEFAULT_USER_AGENT: &str = concat!("DeviceClientType=c/", env!("CARGO_PKG_VERSION"));

/// Version of the Nimbus SDK
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
