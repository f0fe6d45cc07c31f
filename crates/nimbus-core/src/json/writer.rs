// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Validated push encoder over a caller-provided buffer.
//!
//! Every append first checks that the write is legal for the current
//! nesting state, then computes the exact byte count it needs (including a
//! leading comma when one is due) before touching the destination. On
//! [`Error::NotEnoughSpace`] the visible output is unchanged.

use crate::error::{Error, Result};
use crate::json::{BitStack, ContainerKind, JsonTokenKind, MAX_NESTING_DEPTH};
use crate::span::numeric::decimal_digits;
use crate::span::{to_upper_hex, ByteWriter};

// Max size for a string value before escaping (~ INT32_MAX / 6); anything
// longer could overflow the escaped-length computation.
const MAX_UNESCAPED_STRING_SIZE: usize = 166_666_666;

/// Writer configuration. Reserved; `Default` is the only configuration
/// today.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriterOptions {}

/// Streaming push writer over borrowed destination bytes.
///
/// ```
/// use nimbus_core::json::JsonWriter;
///
/// let mut buf = [0u8; 64];
/// let mut writer = JsonWriter::new(&mut buf, None);
/// writer.append_begin_array().unwrap();
/// writer.append_int32(-3).unwrap();
/// writer.append_string(b"a\"b").unwrap();
/// writer.append_end_array().unwrap();
/// assert_eq!(writer.as_written(), b"[-3,\"a\\\"b\"]");
/// ```
pub struct JsonWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    stack: BitStack,
    last: JsonTokenKind,
    need_comma: bool,
}

fn escaped_length(value: &[u8]) -> usize {
    let mut length = 0usize;
    for &byte in value {
        length += match byte {
            b'\\' | b'"' | 0x08 | 0x0C | b'\n' | b'\r' | b'\t' => 2,
            byte if byte < 0x20 => 6, // \u00XX
            _ => 1,
        };
    }
    length
}

impl<'a> JsonWriter<'a> {
    /// Create a writer over `destination`.
    pub fn new(destination: &'a mut [u8], options: Option<JsonWriterOptions>) -> Self {
        let _ = options;
        Self {
            buf: destination,
            len: 0,
            stack: BitStack::default(),
            last: JsonTokenKind::None,
            need_comma: false,
        }
    }

    /// Number of bytes emitted so far.
    pub const fn bytes_written(&self) -> usize {
        self.len
    }

    /// Borrow the output produced so far.
    pub fn as_written(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Finish writing and return the produced output.
    pub fn finish(self) -> &'a [u8] {
        &self.buf[..self.len]
    }

    #[inline]
    const fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    #[inline]
    fn push_raw(&mut self, byte: u8) {
        // Capacity was checked by the caller.
        self.buf[self.len] = byte;
        self.len += 1;
    }

    fn update(&mut self, need_comma: bool, kind: JsonTokenKind) {
        self.need_comma = need_comma;
        self.last = kind;
    }

    /// A value (primitive or container start) is legal inside an array,
    /// after a property name, or as the lone root value.
    fn value_append_allowed(&self) -> bool {
        if self.stack.within_object() {
            self.last == JsonTokenKind::PropertyName
        } else {
            !(self.stack.depth() == 0 && self.last != JsonTokenKind::None)
        }
    }

    /// A property name is legal inside an object when the previous token is
    /// not itself a property name.
    fn property_name_append_allowed(&self) -> bool {
        self.stack.within_object() && self.last != JsonTokenKind::PropertyName
    }

    /// A container end is legal when it matches the innermost open
    /// container and no property name is dangling.
    fn container_end_allowed(&self, byte: u8) -> bool {
        if self.stack.depth() == 0 || self.last == JsonTokenKind::PropertyName {
            return false;
        }
        if byte == b']' {
            !self.stack.within_object()
        } else {
            self.stack.within_object()
        }
    }

    fn escape_and_copy(&mut self, value: &[u8]) {
        for &byte in value {
            let escaped = match byte {
                b'\\' | b'"' => byte,
                0x08 => b'b',
                0x0C => b'f',
                b'\n' => b'n',
                b'\r' => b'r',
                b'\t' => b't',
                byte if byte < 0x20 => {
                    self.push_raw(b'\\');
                    self.push_raw(b'u');
                    self.push_raw(b'0');
                    self.push_raw(b'0');
                    self.push_raw(to_upper_hex(byte >> 4));
                    self.push_raw(to_upper_hex(byte & 0x0F));
                    continue;
                }
                byte => {
                    self.push_raw(byte);
                    continue;
                }
            };
            self.push_raw(b'\\');
            self.push_raw(escaped);
        }
    }

    /// Append `{`.
    pub fn append_begin_object(&mut self) -> Result<()> {
        self.append_container_start(b'{', JsonTokenKind::BeginObject, ContainerKind::Object)
    }

    /// Append `[`.
    pub fn append_begin_array(&mut self) -> Result<()> {
        self.append_container_start(b'[', JsonTokenKind::BeginArray, ContainerKind::Array)
    }

    fn append_container_start(
        &mut self,
        byte: u8,
        kind: JsonTokenKind,
        container: ContainerKind,
    ) -> Result<()> {
        if !self.value_append_allowed() {
            return Err(Error::JsonInvalidState);
        }
        if self.stack.depth() >= MAX_NESTING_DEPTH {
            return Err(Error::JsonNestingOverflow);
        }

        let required = 1 + usize::from(self.need_comma);
        if self.remaining() < required {
            return Err(Error::NotEnoughSpace);
        }

        if self.need_comma {
            self.push_raw(b',');
        }
        self.push_raw(byte);

        self.stack.push(container);
        self.update(false, kind);
        Ok(())
    }

    /// Append `}`.
    pub fn append_end_object(&mut self) -> Result<()> {
        self.append_container_end(b'}', JsonTokenKind::EndObject)
    }

    /// Append `]`.
    pub fn append_end_array(&mut self) -> Result<()> {
        self.append_container_end(b']', JsonTokenKind::EndArray)
    }

    fn append_container_end(&mut self, byte: u8, kind: JsonTokenKind) -> Result<()> {
        if !self.container_end_allowed(byte) {
            return Err(Error::JsonInvalidState);
        }
        if self.remaining() < 1 {
            return Err(Error::NotEnoughSpace);
        }
        self.push_raw(byte);
        self.stack.pop();
        self.update(true, kind);
        Ok(())
    }

    /// Append `"name":` with escape-on-write.
    pub fn append_property_name(&mut self, name: &[u8]) -> Result<()> {
        if !self.property_name_append_allowed() {
            return Err(Error::JsonInvalidState);
        }
        if name.len() > MAX_UNESCAPED_STRING_SIZE {
            return Err(Error::InvalidArgument);
        }

        // Surrounding quotes plus the name/value separator colon.
        let required = 3 + usize::from(self.need_comma) + escaped_length(name);
        if self.remaining() < required {
            return Err(Error::NotEnoughSpace);
        }

        if self.need_comma {
            self.push_raw(b',');
        }
        self.push_raw(b'"');
        self.escape_and_copy(name);
        self.push_raw(b'"');
        self.push_raw(b':');

        self.update(false, JsonTokenKind::PropertyName);
        Ok(())
    }

    /// Append `"value"` with escape-on-write.
    pub fn append_string(&mut self, value: &[u8]) -> Result<()> {
        if !self.value_append_allowed() {
            return Err(Error::JsonInvalidState);
        }
        if value.len() > MAX_UNESCAPED_STRING_SIZE {
            return Err(Error::InvalidArgument);
        }

        let required = 2 + usize::from(self.need_comma) + escaped_length(value);
        if self.remaining() < required {
            return Err(Error::NotEnoughSpace);
        }

        if self.need_comma {
            self.push_raw(b',');
        }
        self.push_raw(b'"');
        self.escape_and_copy(value);
        self.push_raw(b'"');

        self.update(true, JsonTokenKind::String);
        Ok(())
    }

    fn append_literal(&mut self, literal: &'static [u8], kind: JsonTokenKind) -> Result<()> {
        if !self.value_append_allowed() {
            return Err(Error::JsonInvalidState);
        }

        let required = literal.len() + usize::from(self.need_comma);
        if self.remaining() < required {
            return Err(Error::NotEnoughSpace);
        }

        if self.need_comma {
            self.push_raw(b',');
        }
        for &byte in literal {
            self.push_raw(byte);
        }

        self.update(true, kind);
        Ok(())
    }

    /// Append `true` or `false`.
    pub fn append_bool(&mut self, value: bool) -> Result<()> {
        if value {
            self.append_literal(b"true", JsonTokenKind::True)
        } else {
            self.append_literal(b"false", JsonTokenKind::False)
        }
    }

    /// Append `null`.
    pub fn append_null(&mut self) -> Result<()> {
        self.append_literal(b"null", JsonTokenKind::Null)
    }

    /// Append a 32-bit signed decimal number.
    pub fn append_int32(&mut self, value: i32) -> Result<()> {
        if !self.value_append_allowed() {
            return Err(Error::JsonInvalidState);
        }

        let digits = decimal_digits(u64::from(value.unsigned_abs()));
        let required = digits + usize::from(value < 0) + usize::from(self.need_comma);
        if self.remaining() < required {
            return Err(Error::NotEnoughSpace);
        }

        if self.need_comma {
            self.push_raw(b',');
        }
        let mut number = ByteWriter::new(&mut self.buf[self.len..]);
        number.write_i32(value)?;
        self.len += number.position();

        self.update(true, JsonTokenKind::Number);
        Ok(())
    }

    /// Append a finite double with at most `fractional_digits` digits after
    /// the decimal point (see [`ByteWriter::write_f64`]).
    pub fn append_double(&mut self, value: f64, fractional_digits: u32) -> Result<()> {
        if !self.value_append_allowed() {
            return Err(Error::JsonInvalidState);
        }

        let comma = usize::from(self.need_comma);
        if self.remaining() < comma + 1 {
            return Err(Error::NotEnoughSpace);
        }

        // Format past the optional comma slot first; commit both only when
        // the number fits.
        let mut number = ByteWriter::new(&mut self.buf[self.len + comma..]);
        number.write_f64(value, fractional_digits)?;
        let written = number.position();

        if comma == 1 {
            self.buf[self.len] = b',';
        }
        self.len += comma + written;

        self.update(true, JsonTokenKind::Number);
        Ok(())
    }
}
