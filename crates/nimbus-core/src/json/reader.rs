// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Single-pass pull tokenizer with strict RFC 8259 validation.
//!
//! The reader borrows its input and never copies payload bytes. Input is
//! either one contiguous slice or the logical concatenation of a slice
//! table (chunked mode); tokenization crosses chunk boundaries
//! transparently.

use crate::error::{Error, Result};
use crate::json::token::{JsonToken, TokenText};
use crate::json::{BitStack, ContainerKind, JsonTokenKind, MAX_NESTING_DEPTH};
use crate::span::is_whitespace;

/// Reader configuration. Reserved; `Default` is the only configuration
/// today.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReaderOptions {}

/// Borrowed input: one slice or an ordered table of slices.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Chunks<'a> {
    Single(&'a [u8]),
    Multi(&'a [&'a [u8]]),
}

/// Normalized cursor into [`Chunks`]: either addresses a real byte
/// (`chunk < count`, `offset < chunk_len`) or is the end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pos {
    pub(crate) chunk: usize,
    pub(crate) offset: usize,
}

impl<'a> Chunks<'a> {
    pub(crate) fn count(self) -> usize {
        match self {
            Chunks::Single(_) => 1,
            Chunks::Multi(chunks) => chunks.len(),
        }
    }

    pub(crate) fn get(self, index: usize) -> &'a [u8] {
        match self {
            Chunks::Single(slice) => slice,
            Chunks::Multi(chunks) => chunks[index],
        }
    }

    pub(crate) fn total_len(self) -> usize {
        match self {
            Chunks::Single(slice) => slice.len(),
            Chunks::Multi(chunks) => chunks.iter().map(|c| c.len()).sum(),
        }
    }

    /// Advance `pos` by `n` bytes, rolling across chunk boundaries and
    /// skipping empty chunks.
    pub(crate) fn advanced(self, pos: Pos, n: usize) -> Pos {
        let mut p = Pos {
            chunk: pos.chunk,
            offset: pos.offset + n,
        };
        while p.chunk < self.count() {
            let len = self.get(p.chunk).len();
            if p.offset < len {
                break;
            }
            p.offset -= len;
            p.chunk += 1;
        }
        p
    }

    /// Byte at a normalized position, `None` at end of input.
    pub(crate) fn byte_at(self, pos: Pos) -> Option<u8> {
        if pos.chunk >= self.count() {
            return None;
        }
        Some(self.get(pos.chunk)[pos.offset])
    }

    pub(crate) fn start(self) -> Pos {
        self.advanced(Pos { chunk: 0, offset: 0 }, 0)
    }
}

#[inline]
const fn is_delimiter(byte: u8) -> bool {
    // Whitespace, comma, or a container end terminate a JSON number.
    matches!(byte, b',' | b'}' | b']' | b' ' | b'\n' | b'\r' | b'\t')
}

#[inline]
const fn is_valid_escape(byte: u8) -> bool {
    matches!(byte, b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't')
}

/// Streaming pull reader over borrowed JSON text.
///
/// Call [`next_token`](Self::next_token) to advance; the current token is
/// available through [`token`](Self::token). When the root value has been
/// fully consumed, `next_token` returns [`Error::EndOfJson`].
pub struct JsonReader<'a> {
    chunks: Chunks<'a>,
    pos: Pos,
    token: JsonToken<'a>,
    stack: BitStack,
    is_complex_json: bool,
}

impl<'a> JsonReader<'a> {
    /// Create a reader over one contiguous buffer. The buffer must not be
    /// empty.
    pub fn new(input: &'a [u8], options: Option<JsonReaderOptions>) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::InvalidArgument);
        }
        let _ = options;
        Ok(Self::over(Chunks::Single(input)))
    }

    /// Create a reader over the logical concatenation of `chunks`, in
    /// order. At least one byte of input is required in total.
    pub fn chunked(chunks: &'a [&'a [u8]], options: Option<JsonReaderOptions>) -> Result<Self> {
        let input = Chunks::Multi(chunks);
        if input.total_len() == 0 {
            return Err(Error::InvalidArgument);
        }
        let _ = options;
        Ok(Self::over(input))
    }

    fn over(chunks: Chunks<'a>) -> Self {
        Self {
            chunks,
            pos: chunks.start(),
            token: JsonToken::none(),
            stack: BitStack::default(),
            is_complex_json: false,
        }
    }

    /// The token the reader is currently positioned on.
    pub fn token(&self) -> &JsonToken<'a> {
        &self.token
    }

    /// Current container nesting depth (`0..=64`).
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Rewind to the freshly-initialized state over the same input.
    pub fn restart(&mut self) {
        self.pos = self.chunks.start();
        self.token = JsonToken::none();
        self.stack = BitStack::default();
        self.is_complex_json = false;
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.chunks.byte_at(self.pos)
    }

    #[inline]
    fn byte_at(&self, pos: Pos) -> Option<u8> {
        self.chunks.byte_at(pos)
    }

    #[inline]
    fn advanced(&self, pos: Pos, n: usize) -> Pos {
        self.chunks.advanced(pos, n)
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if !is_whitespace(byte) {
                break;
            }
            self.pos = self.advanced(self.pos, 1);
        }
    }

    fn make_text(&self, start: Pos, len: usize) -> TokenText<'a> {
        if len == 0 {
            return TokenText::Contiguous(&[]);
        }
        let chunk = self.chunks.get(start.chunk);
        if start.offset + len <= chunk.len() {
            TokenText::Contiguous(&chunk[start.offset..start.offset + len])
        } else {
            TokenText::Split {
                chunks: self.chunks,
                start,
                len,
            }
        }
    }

    /// Advance to the next token.
    ///
    /// Returns [`Error::EndOfJson`] once the root value has been fully
    /// consumed, [`Error::UnexpectedEnd`] on truncated input and
    /// [`Error::UnexpectedChar`] on any grammar violation.
    pub fn next_token(&mut self) -> Result<()> {
        self.skip_whitespace();

        let first_byte = match self.peek() {
            Some(byte) => byte,
            None => {
                return Err(
                    if self.token.kind() == JsonTokenKind::None || self.stack.depth() > 0 {
                        // Empty payload, or truncated inside a container.
                        Error::UnexpectedEnd
                    } else {
                        Error::EndOfJson
                    },
                );
            }
        };

        match self.token.kind() {
            JsonTokenKind::None => self.read_first_token(first_byte),
            JsonTokenKind::BeginObject => {
                if first_byte == b'}' {
                    self.process_container_end(JsonTokenKind::EndObject)
                } else if first_byte == b'"' {
                    self.process_property_name()
                } else {
                    // The first thing within an object is a property name.
                    Err(Error::UnexpectedChar)
                }
            }
            JsonTokenKind::BeginArray => {
                if first_byte == b']' {
                    self.process_container_end(JsonTokenKind::EndArray)
                } else {
                    self.process_value(first_byte)
                }
            }
            JsonTokenKind::PropertyName => self.process_value(first_byte),
            _ => self.process_next_byte(first_byte),
        }
    }

    /// Skip the children of the current token.
    ///
    /// At a property name, first advances to the value. If the value is a
    /// container, consumes tokens until the reader is back at the pre-entry
    /// depth. Any other token is a no-op.
    pub fn skip_children(&mut self) -> Result<()> {
        if self.token.kind() == JsonTokenKind::PropertyName {
            self.next_token()?;
        }

        if matches!(
            self.token.kind(),
            JsonTokenKind::BeginObject | JsonTokenKind::BeginArray
        ) {
            // Keep moving until we come back out of the container we are on.
            let entry_depth = self.depth();
            loop {
                self.next_token()?;
                if self.depth() < entry_depth {
                    break;
                }
            }
        }
        Ok(())
    }

    fn read_first_token(&mut self, first_byte: u8) -> Result<()> {
        match first_byte {
            b'{' => {
                self.stack.push(ContainerKind::Object);
                let text = self.make_text(self.pos, 1);
                self.pos = self.advanced(self.pos, 1);
                self.token = JsonToken::new(JsonTokenKind::BeginObject, text, false);
                self.is_complex_json = true;
                Ok(())
            }
            b'[' => {
                self.stack.push(ContainerKind::Array);
                let text = self.make_text(self.pos, 1);
                self.pos = self.advanced(self.pos, 1);
                self.token = JsonToken::new(JsonTokenKind::BeginArray, text, false);
                self.is_complex_json = true;
                Ok(())
            }
            _ => self.process_value(first_byte),
        }
    }

    fn process_value(&mut self, first_byte: u8) -> Result<()> {
        match first_byte {
            b'"' => self.process_string(),
            b'{' => self.process_container_start(JsonTokenKind::BeginObject, ContainerKind::Object),
            b'[' => self.process_container_start(JsonTokenKind::BeginArray, ContainerKind::Array),
            b'-' => self.process_number(),
            b'f' => self.process_literal(b"false", JsonTokenKind::False),
            b't' => self.process_literal(b"true", JsonTokenKind::True),
            b'n' => self.process_literal(b"null", JsonTokenKind::Null),
            byte if byte.is_ascii_digit() => self.process_number(),
            _ => Err(Error::UnexpectedChar),
        }
    }

    fn process_container_start(
        &mut self,
        kind: JsonTokenKind,
        container: ContainerKind,
    ) -> Result<()> {
        if self.stack.depth() >= MAX_NESTING_DEPTH {
            return Err(Error::JsonNestingOverflow);
        }
        let text = self.make_text(self.pos, 1);
        self.stack.push(container);
        self.pos = self.advanced(self.pos, 1);
        self.token = JsonToken::new(kind, text, false);
        Ok(())
    }

    fn process_container_end(&mut self, kind: JsonTokenKind) -> Result<()> {
        let expected = if kind == JsonTokenKind::EndObject {
            ContainerKind::Object
        } else {
            ContainerKind::Array
        };
        // A mismatched container end without a matching open is invalid.
        if self.stack.depth() == 0 || self.stack.peek() != expected {
            return Err(Error::UnexpectedChar);
        }
        let text = self.make_text(self.pos, 1);
        self.stack.pop();
        self.pos = self.advanced(self.pos, 1);
        self.token = JsonToken::new(kind, text, false);
        Ok(())
    }

    fn process_string(&mut self) -> Result<()> {
        // Past the opening quote; nothing is committed until the closing
        // quote has been seen.
        let start = self.advanced(self.pos, 1);
        let mut p = start;
        let mut len = 0usize;
        let mut has_escapes = false;

        loop {
            let byte = self.byte_at(p).ok_or(Error::UnexpectedEnd)?;
            if byte == b'"' {
                break;
            }
            if byte == b'\\' {
                has_escapes = true;
                let escape_pos = self.advanced(p, 1);
                let escape = self.byte_at(escape_pos).ok_or(Error::UnexpectedEnd)?;
                if escape == b'u' {
                    // Exactly 4 ASCII hex digits must follow.
                    let mut hex = self.advanced(escape_pos, 1);
                    for _ in 0..4 {
                        let digit = self.byte_at(hex).ok_or(Error::UnexpectedEnd)?;
                        if !digit.is_ascii_hexdigit() {
                            return Err(Error::UnexpectedChar);
                        }
                        hex = self.advanced(hex, 1);
                    }
                    p = hex;
                    len += 6;
                } else {
                    if !is_valid_escape(escape) {
                        return Err(Error::UnexpectedChar);
                    }
                    p = self.advanced(escape_pos, 1);
                    len += 2;
                }
            } else {
                // Raw control characters must be escaped.
                if byte < 0x20 {
                    return Err(Error::UnexpectedChar);
                }
                p = self.advanced(p, 1);
                len += 1;
            }
        }

        let text = self.make_text(start, len);
        self.pos = self.advanced(p, 1); // past the closing quote
        self.token = JsonToken::new(JsonTokenKind::String, text, has_escapes);
        Ok(())
    }

    fn process_property_name(&mut self) -> Result<()> {
        self.process_string()?;
        self.skip_whitespace();

        match self.peek() {
            None => Err(Error::UnexpectedEnd),
            Some(b':') => {
                self.pos = self.advanced(self.pos, 1);
                self.token.set_kind(JsonTokenKind::PropertyName);
                Ok(())
            }
            Some(_) => Err(Error::UnexpectedChar),
        }
    }

    fn consume_digits(&self, mut p: Pos, len: &mut usize) -> Pos {
        while let Some(byte) = self.byte_at(p) {
            if !byte.is_ascii_digit() {
                break;
            }
            p = self.advanced(p, 1);
            *len += 1;
        }
        p
    }

    fn commit_number(&mut self, start: Pos, len: usize, end: Pos) -> Result<()> {
        let text = self.make_text(start, len);
        self.pos = end;
        self.token = JsonToken::new(JsonTokenKind::Number, text, false);
        Ok(())
    }

    /// End of input inside a number: valid only for a root-level primitive
    /// payload.
    fn finish_number_at_end(&mut self, start: Pos, len: usize, end: Pos) -> Result<()> {
        if self.is_complex_json {
            return Err(Error::UnexpectedEnd);
        }
        self.commit_number(start, len, end)
    }

    fn process_number(&mut self) -> Result<()> {
        let start = self.pos;
        let mut p = self.pos;
        let mut len = 0usize;

        let mut byte = self.byte_at(p).ok_or(Error::UnexpectedEnd)?;
        if byte == b'-' {
            p = self.advanced(p, 1);
            len += 1;
            // A negative sign must be followed by at least one digit.
            byte = self.byte_at(p).ok_or(Error::UnexpectedEnd)?;
            if !byte.is_ascii_digit() {
                return Err(Error::UnexpectedChar);
            }
        }

        if byte == b'0' {
            // A leading zero takes no further integer digits.
            p = self.advanced(p, 1);
            len += 1;
        } else {
            p = self.consume_digits(p, &mut len);
        }

        byte = match self.byte_at(p) {
            None => return self.finish_number_at_end(start, len, p),
            Some(next) if is_delimiter(next) => return self.commit_number(start, len, p),
            Some(next) if matches!(next, b'.' | b'e' | b'E') => next,
            Some(_) => return Err(Error::UnexpectedChar),
        };

        if byte == b'.' {
            p = self.advanced(p, 1);
            len += 1;
            // A decimal point must be followed by at least one digit.
            let next = self.byte_at(p).ok_or(Error::UnexpectedEnd)?;
            if !next.is_ascii_digit() {
                return Err(Error::UnexpectedChar);
            }
            p = self.consume_digits(p, &mut len);

            byte = match self.byte_at(p) {
                None => return self.finish_number_at_end(start, len, p),
                Some(next) if is_delimiter(next) => return self.commit_number(start, len, p),
                Some(next) if matches!(next, b'e' | b'E') => next,
                Some(_) => return Err(Error::UnexpectedChar),
            };
        }

        debug_assert!(byte == b'e' || byte == b'E');
        p = self.advanced(p, 1);
        len += 1;

        // The exponent marker must be followed by an optional sign and at
        // least one digit.
        match self.byte_at(p) {
            None => return Err(Error::UnexpectedEnd),
            Some(b'+') | Some(b'-') => {
                p = self.advanced(p, 1);
                len += 1;
                let next = self.byte_at(p).ok_or(Error::UnexpectedEnd)?;
                if !next.is_ascii_digit() {
                    return Err(Error::UnexpectedChar);
                }
            }
            Some(next) if next.is_ascii_digit() => {}
            Some(_) => return Err(Error::UnexpectedChar),
        }
        p = self.consume_digits(p, &mut len);

        match self.byte_at(p) {
            None => self.finish_number_at_end(start, len, p),
            Some(next) if is_delimiter(next) => self.commit_number(start, len, p),
            Some(_) => Err(Error::UnexpectedChar),
        }
    }

    fn process_literal(&mut self, literal: &'static [u8], kind: JsonTokenKind) -> Result<()> {
        let start = self.pos;
        let mut p = self.pos;
        for &expected in literal {
            let byte = self.byte_at(p).ok_or(Error::UnexpectedEnd)?;
            if byte != expected {
                return Err(Error::UnexpectedChar);
            }
            p = self.advanced(p, 1);
        }
        let text = self.make_text(start, literal.len());
        self.pos = p;
        self.token = JsonToken::new(kind, text, false);
        Ok(())
    }

    fn process_next_byte(&mut self, first_byte: u8) -> Result<()> {
        // Extra data after a complete root value is invalid.
        if self.stack.depth() == 0 {
            return Err(Error::UnexpectedChar);
        }

        let within_object = self.stack.peek() == ContainerKind::Object;

        match first_byte {
            b',' => {
                // Look past the comma before committing, so a truncated
                // input re-fails the same way on the next call.
                let mut p = self.advanced(self.pos, 1);
                while let Some(byte) = self.byte_at(p) {
                    if !is_whitespace(byte) {
                        break;
                    }
                    p = self.advanced(p, 1);
                }
                let next = self.byte_at(p).ok_or(Error::UnexpectedEnd)?;
                self.pos = p;

                if within_object {
                    if next != b'"' {
                        return Err(Error::UnexpectedChar);
                    }
                    self.process_property_name()
                } else {
                    self.process_value(next)
                }
            }
            b'}' => self.process_container_end(JsonTokenKind::EndObject),
            b']' => self.process_container_end(JsonTokenKind::EndArray),
            _ => Err(Error::UnexpectedChar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &[u8]) -> Result<Vec<JsonTokenKind>> {
        let mut reader = JsonReader::new(input, None)?;
        let mut out = Vec::new();
        loop {
            match reader.next_token() {
                Ok(()) => out.push(reader.token().kind()),
                Err(Error::EndOfJson) => return Ok(out),
                Err(e) => return Err(e),
            }
        }
    }

    #[test]
    fn test_object_token_sequence() {
        let kinds = kinds(b"{\"a\":1,\"b\":[true,null]}").unwrap();
        assert_eq!(
            kinds,
            vec![
                JsonTokenKind::BeginObject,
                JsonTokenKind::PropertyName,
                JsonTokenKind::Number,
                JsonTokenKind::PropertyName,
                JsonTokenKind::BeginArray,
                JsonTokenKind::True,
                JsonTokenKind::Null,
                JsonTokenKind::EndArray,
                JsonTokenKind::EndObject,
            ]
        );
    }

    #[test]
    fn test_root_primitives() {
        assert_eq!(kinds(b"true").unwrap(), vec![JsonTokenKind::True]);
        assert_eq!(kinds(b"null").unwrap(), vec![JsonTokenKind::Null]);
        assert_eq!(kinds(b"-12.5e3").unwrap(), vec![JsonTokenKind::Number]);
        assert_eq!(kinds(b"\"hi\"").unwrap(), vec![JsonTokenKind::String]);
        assert_eq!(kinds(b" 42 ").unwrap(), vec![JsonTokenKind::Number]);
    }

    #[test]
    fn test_trailing_garbage_after_root() {
        assert_eq!(kinds(b"1 2"), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"{} x"), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"true false"), Err(Error::UnexpectedChar));
    }

    #[test]
    fn test_strict_number_failures() {
        for bad in [
            &b"01"[..],
            b"1.",
            b"1e",
            b"1e+",
            b".5",
            b"+5",
            b"1.2.3",
            b"1e2e3",
            b"-",
            b"1x",
        ] {
            let result = kinds(bad);
            assert!(
                matches!(result, Err(Error::UnexpectedChar) | Err(Error::UnexpectedEnd)),
                "input {:?} gave {:?}",
                core::str::from_utf8(bad).unwrap(),
                result
            );
        }
    }

    #[test]
    fn test_strict_structure_failures() {
        assert_eq!(kinds(b"{"), Err(Error::UnexpectedEnd));
        assert_eq!(kinds(b"["), Err(Error::UnexpectedEnd));
        assert_eq!(kinds(b"{\"a\""), Err(Error::UnexpectedEnd));
        assert_eq!(kinds(b"{\"a\":}"), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"{\"a\":1,}"), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"[1,]"), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"[1}"), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"{\"a\":1]"), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"   "), Err(Error::UnexpectedEnd));
    }

    #[test]
    fn test_strict_string_failures() {
        assert_eq!(kinds(b"\"a\x01b\""), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"\"a\\qb\""), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"\"a\\u12GZ\""), Err(Error::UnexpectedChar));
        assert_eq!(kinds(b"\"abc"), Err(Error::UnexpectedEnd));
    }

    #[test]
    fn test_string_slice_excludes_quotes() {
        let mut reader = JsonReader::new(b"\"hel\\nlo\"", None).unwrap();
        reader.next_token().unwrap();
        assert_eq!(reader.token().kind(), JsonTokenKind::String);
        assert_eq!(reader.token().slice(), Some(&b"hel\\nlo"[..]));
        assert!(reader.token().has_escapes());
    }

    #[test]
    fn test_nesting_depth_limit() {
        let mut input = Vec::new();
        for _ in 0..64 {
            input.push(b'[');
        }
        let mut reader = JsonReader::new(&input, None).unwrap();
        for _ in 0..64 {
            reader.next_token().unwrap();
        }
        assert_eq!(reader.depth(), 64);

        let mut input = Vec::new();
        for _ in 0..65 {
            input.push(b'[');
        }
        let mut reader = JsonReader::new(&input, None).unwrap();
        for _ in 0..64 {
            reader.next_token().unwrap();
        }
        assert_eq!(reader.next_token(), Err(Error::JsonNestingOverflow));
    }

    #[test]
    fn test_error_is_sticky() {
        let mut reader = JsonReader::new(b"{\"a\":01}", None).unwrap();
        reader.next_token().unwrap();
        reader.next_token().unwrap();
        assert_eq!(reader.next_token(), Err(Error::UnexpectedChar));
        assert_eq!(reader.next_token(), Err(Error::UnexpectedChar));
    }

    #[test]
    fn test_skip_children() {
        let mut reader =
            JsonReader::new(b"{\"a\":{\"x\":[1,2],\"y\":3},\"b\":4}", None).unwrap();
        reader.next_token().unwrap(); // {
        reader.next_token().unwrap(); // "a"
        reader.skip_children().unwrap(); // consumes the whole nested object
        assert_eq!(reader.token().kind(), JsonTokenKind::EndObject);
        assert_eq!(reader.depth(), 1);
        reader.next_token().unwrap();
        assert!(reader.token().is_text_equal(b"b"));
    }

    #[test]
    fn test_skip_children_on_primitive_is_noop() {
        let mut reader = JsonReader::new(b"[1,2]", None).unwrap();
        reader.next_token().unwrap(); // [
        reader.next_token().unwrap(); // 1
        reader.skip_children().unwrap();
        assert_eq!(reader.token().kind(), JsonTokenKind::Number);
        reader.next_token().unwrap();
        assert_eq!(reader.token().as_i32().unwrap(), 2);
    }

    #[test]
    fn test_restart() {
        let mut reader = JsonReader::new(b"{\"a\":1}", None).unwrap();
        while reader.next_token().is_ok() {}
        reader.restart();
        reader.next_token().unwrap();
        assert_eq!(reader.token().kind(), JsonTokenKind::BeginObject);
        assert_eq!(reader.depth(), 1);
    }

    #[test]
    fn test_chunked_matches_contiguous() {
        let json = b"{\"name\":\"va\\tlue\",\"n\":-12.75,\"ok\":true}";
        // Split at every position, including mid-token.
        for split in 1..json.len() {
            let parts = [&json[..split], &json[split..]];
            let mut chunked = JsonReader::chunked(&parts, None).unwrap();
            let mut whole = JsonReader::new(json, None).unwrap();
            loop {
                let a = whole.next_token();
                let b = chunked.next_token();
                assert_eq!(a, b, "split at {}", split);
                if a.is_err() {
                    break;
                }
                assert_eq!(whole.token().kind(), chunked.token().kind());
                let expected: Vec<u8> = whole.token().bytes().collect();
                let actual: Vec<u8> = chunked.token().bytes().collect();
                assert_eq!(expected, actual, "split at {}", split);
            }
        }
    }

    #[test]
    fn test_chunked_tiny_chunks() {
        let json = b"[true,\"ab\",10]";
        let parts: Vec<&[u8]> = json.chunks(1).collect();
        let mut reader = JsonReader::chunked(&parts, None).unwrap();
        let mut kinds = Vec::new();
        loop {
            match reader.next_token() {
                Ok(()) => kinds.push(reader.token().kind()),
                Err(Error::EndOfJson) => break,
                Err(e) => panic!("{e}"),
            }
        }
        assert_eq!(
            kinds,
            vec![
                JsonTokenKind::BeginArray,
                JsonTokenKind::True,
                JsonTokenKind::String,
                JsonTokenKind::Number,
                JsonTokenKind::EndArray,
            ]
        );
    }

    #[test]
    fn test_chunked_split_token_values() {
        let parts: [&[u8]; 3] = [b"{\"count\":1234", b"5,\"label\":\"ab", b"cd\"}"];
        let mut reader = JsonReader::chunked(&parts, None).unwrap();
        reader.next_token().unwrap();
        reader.next_token().unwrap();
        assert!(reader.token().is_text_equal(b"count"));
        reader.next_token().unwrap();
        // Token spans two chunks, so no contiguous slice is available.
        assert_eq!(reader.token().slice(), None);
        assert_eq!(reader.token().as_i32().unwrap(), 12345);
        reader.next_token().unwrap();
        reader.next_token().unwrap();
        assert!(reader.token().is_text_equal(b"abcd"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(JsonReader::new(b"", None).is_err());
        let parts: [&[u8]; 2] = [b"", b""];
        assert!(JsonReader::chunked(&parts, None).is_err());
    }
}
