// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! # Nimbus Core - Allocation-free Data-Plane Engines
//!
//! The foundation of the Nimbus device SDK: byte-span utilities and a
//! streaming JSON reader/writer designed for resource-constrained devices
//! talking to a cloud IoT hub.
//!
//! ## Design Constraints
//!
//! - **No heap allocations** anywhere (caller-provided buffers only)
//! - **No I/O, no blocking** (pure functions over byte slices)
//! - **`no_std` compatible** (enable `std` for host testing)
//! - **Strict parsing** (RFC 8259 JSON, full-span numeric conversion)
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------+
//! |  Application / nimbus-iot protocol      |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  JsonWriter          JsonReader / Token |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  span (ByteWriter, numeric, url-encode) |
//! +-----------------------------------------+
//! ```
//!
//! ## Feature Flags
//!
//! - `std` -- enable `std::error::Error` impls and host testing (default)
//! - `heapless` -- bounded owned-string token extraction
//!
//! ## Example
//!
//! ```
//! use nimbus_core::json::{JsonReader, JsonTokenKind};
//!
//! let mut reader = JsonReader::new(b"{\"temperature\":21.5}", None).unwrap();
//! reader.next_token().unwrap();
//! assert_eq!(reader.token().kind(), JsonTokenKind::BeginObject);
//! reader.next_token().unwrap();
//! assert!(reader.token().is_text_equal(b"temperature"));
//! reader.next_token().unwrap();
//! assert_eq!(reader.token().as_f64().unwrap(), 21.5);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error types shared across the workspace
pub mod error;

/// Streaming JSON reader, writer and token accessors
pub mod json;

/// Byte-span utilities (copy, compare, find, trim, url-encode, numeric)
pub mod span;

// Re-exports for convenience
pub use crate::error::{Error, Result};
pub use crate::json::{JsonReader, JsonToken, JsonTokenKind, JsonWriter};
pub use crate::span::ByteWriter;

/// Version of the Nimbus SDK
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
