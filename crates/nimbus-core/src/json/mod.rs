// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Streaming JSON engine.
//!
//! A single-pass pull reader ([`JsonReader`]) and a validated push writer
//! ([`JsonWriter`]) over caller-provided buffers, plus type-checked token
//! accessors ([`JsonToken`]). The grammar is strict RFC 8259: no comments,
//! no trailing commas, no unquoted identifiers, no leading zeros or signs.
//!
//! Nesting is bounded at 64 levels; both directions track container nesting
//! in a single 64-bit word.
//!
//! ## Reading
//!
//! ```
//! use nimbus_core::json::{JsonReader, JsonTokenKind};
//!
//! let mut reader = JsonReader::new(b"[1,true,\"x\"]", None).unwrap();
//! reader.next_token().unwrap();
//! assert_eq!(reader.token().kind(), JsonTokenKind::BeginArray);
//! reader.next_token().unwrap();
//! assert_eq!(reader.token().as_i32().unwrap(), 1);
//! ```
//!
//! ## Writing
//!
//! ```
//! use nimbus_core::json::JsonWriter;
//!
//! let mut buf = [0u8; 32];
//! let mut writer = JsonWriter::new(&mut buf, None);
//! writer.append_begin_object().unwrap();
//! writer.append_property_name(b"on").unwrap();
//! writer.append_bool(true).unwrap();
//! writer.append_end_object().unwrap();
//! assert_eq!(writer.as_written(), b"{\"on\":true}");
//! ```

mod reader;
mod stack;
mod token;
mod writer;

pub use reader::{JsonReader, JsonReaderOptions};
pub use token::{JsonToken, TokenBytes};
pub use writer::{JsonWriter, JsonWriterOptions};

pub(crate) use stack::{BitStack, ContainerKind, MAX_NESTING_DEPTH};

/// Kind of the token the reader is positioned on, or the last one the writer
/// emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonTokenKind {
    /// No token yet (fresh reader/writer)
    #[default]
    None,
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// Object member name (the string before a `:`)
    PropertyName,
    /// String value
    String,
    /// Number value (not decoded during tokenization)
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

