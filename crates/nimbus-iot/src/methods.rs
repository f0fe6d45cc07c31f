// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Direct-method topics.

use crate::topic::{query_param, split_query};
use nimbus_core::error::{Error, Result};
use nimbus_core::span::ByteWriter;

/// Subscribe filter for incoming method requests.
pub const SUBSCRIBE_TOPIC: &str = "$iothub/methods/POST/#";

const METHODS_PREFIX: &[u8] = b"$iothub/methods/";
const POST_SEGMENT: &[u8] = b"POST/";
const RESPONSE_PREFIX: &[u8] = b"$iothub/methods/res/";

/// A parsed direct-method request topic.
#[derive(Debug, Clone, Copy)]
pub struct MethodRequest<'a> {
    /// Method name the service invoked
    pub name: &'a [u8],
    /// Opaque request id to echo in the response topic
    pub request_id: &'a [u8],
}

/// Match a received topic against the method-request family:
/// `$iothub/methods/POST/{name}/?$rid={request_id}`.
///
/// A topic outside `$iothub/methods/POST/` is [`Error::TopicNoMatch`]; a
/// matching topic with a malformed name segment or without `$rid` is
/// [`Error::UnexpectedChar`].
pub fn parse_received_topic(topic: &[u8]) -> Result<MethodRequest<'_>> {
    let rest = topic.strip_prefix(METHODS_PREFIX).ok_or(Error::TopicNoMatch)?;
    let rest = rest.strip_prefix(POST_SEGMENT).ok_or_else(|| {
        log::debug!("[methods] topic in methods family is not a POST request");
        Error::TopicNoMatch
    })?;

    let name_end = rest
        .iter()
        .position(|&b| b == b'/')
        .ok_or(Error::UnexpectedChar)?;
    let name = &rest[..name_end];
    if name.is_empty() {
        return Err(Error::UnexpectedChar);
    }

    let (_, query) = split_query(&rest[name_end + 1..]);
    let request_id = query_param(query, b"$rid").ok_or(Error::UnexpectedChar)?;

    Ok(MethodRequest { name, request_id })
}

/// Format the method response publish topic into `dst`:
/// `$iothub/methods/res/{status}/?$rid={request_id}`.
pub fn response_topic<'b>(
    status: u16,
    request_id: &[u8],
    dst: &'b mut [u8],
) -> Result<&'b str> {
    let mut status_digits = 1;
    let mut v = status;
    while v >= 10 {
        v /= 10;
        status_digits += 1;
    }

    let required = RESPONSE_PREFIX.len() + status_digits + "/?$rid=".len() + request_id.len();
    if dst.len() < required {
        return Err(Error::NotEnoughSpace);
    }

    let mut writer = ByteWriter::new(dst);
    writer.write_slice(RESPONSE_PREFIX)?;
    writer.write_u32(u32::from(status))?;
    writer.write_slice(b"/?$rid=")?;
    writer.write_slice(request_id)?;

    let written = writer.position();
    core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
}
