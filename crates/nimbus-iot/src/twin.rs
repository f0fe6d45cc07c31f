// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Twin document topics.
//!
//! The device requests the full twin document with a GET publish, pushes
//! reported properties with a PATCH publish, and receives both responses
//! and desired-property change notifications on the two subscribe filters.

use crate::status::Status;
use crate::topic::{query_param, split_query};
use nimbus_core::error::{Error, Result};
use nimbus_core::span::ByteWriter;

/// Subscribe filter for twin GET/PATCH responses.
pub const RESPONSE_SUBSCRIBE_TOPIC: &str = "$iothub/twin/res/#";

/// Subscribe filter for desired-property change notifications.
pub const PATCH_SUBSCRIBE_TOPIC: &str = "$iothub/twin/PATCH/properties/desired/#";

const TWIN_PREFIX: &[u8] = b"$iothub/twin/";
const RESPONSE_SEGMENT: &[u8] = b"res/";
const PATCH_DESIRED_SEGMENT: &[u8] = b"PATCH/properties/desired/";
const GET_TOPIC_PREFIX: &[u8] = b"$iothub/twin/GET/?$rid=";
const PATCH_TOPIC_PREFIX: &[u8] = b"$iothub/twin/PATCH/properties/reported/?$rid=";

/// Classification of a received twin topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwinResponseType {
    /// Response to a twin GET request (full document in the payload)
    Get,
    /// Response to a reported-properties PATCH
    ReportedProperties,
    /// Desired-property change pushed by the service
    DesiredProperties,
}

/// A parsed twin response or notification topic.
#[derive(Debug, Clone, Copy)]
pub struct TwinResponse<'a> {
    /// Which twin exchange this topic belongs to
    pub response_type: TwinResponseType,
    /// Service status carried in the topic
    pub status: Status,
    /// Request id echoed from the device's request; empty for
    /// service-initiated notifications
    pub request_id: &'a [u8],
    /// Twin version, when the service sent one (raw query value)
    pub version: Option<&'a [u8]>,
}

/// Format the twin GET publish topic into `dst`:
/// `$iothub/twin/GET/?$rid={request_id}`.
pub fn get_publish_topic<'b>(request_id: &[u8], dst: &'b mut [u8]) -> Result<&'b str> {
    prefixed_request_topic(GET_TOPIC_PREFIX, request_id, dst)
}

/// Format the reported-properties PATCH publish topic into `dst`:
/// `$iothub/twin/PATCH/properties/reported/?$rid={request_id}`.
pub fn reported_publish_topic<'b>(request_id: &[u8], dst: &'b mut [u8]) -> Result<&'b str> {
    prefixed_request_topic(PATCH_TOPIC_PREFIX, request_id, dst)
}

fn prefixed_request_topic<'b>(
    prefix: &[u8],
    request_id: &[u8],
    dst: &'b mut [u8],
) -> Result<&'b str> {
    if request_id.is_empty() {
        return Err(Error::InvalidArgument);
    }
    let required = prefix.len() + request_id.len();
    if dst.len() < required {
        return Err(Error::NotEnoughSpace);
    }

    let mut writer = ByteWriter::new(dst);
    writer.write_slice(prefix)?;
    writer.write_slice(request_id)?;

    let written = writer.position();
    core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
}

/// Match a received topic against the twin family and classify it.
///
/// - `$iothub/twin/res/{status}/?$rid=…[&$version=…]` is a [`Get`] response
///   when only `$rid` is present, a [`ReportedProperties`] response when
///   both `$rid` and `$version` are present;
/// - `$iothub/twin/PATCH/properties/desired/?$version=…` is a
///   [`DesiredProperties`] notification.
///
/// Topics outside `$iothub/twin/` are [`Error::TopicNoMatch`].
///
/// [`Get`]: TwinResponseType::Get
/// [`ReportedProperties`]: TwinResponseType::ReportedProperties
/// [`DesiredProperties`]: TwinResponseType::DesiredProperties
pub fn parse_received_topic(topic: &[u8]) -> Result<TwinResponse<'_>> {
    let rest = topic.strip_prefix(TWIN_PREFIX).ok_or(Error::TopicNoMatch)?;

    if let Some(rest) = rest.strip_prefix(PATCH_DESIRED_SEGMENT) {
        let (_, query) = split_query(rest);
        return Ok(TwinResponse {
            response_type: TwinResponseType::DesiredProperties,
            status: Status::Ok,
            request_id: &[],
            version: query_param(query, b"$version"),
        });
    }

    let Some(rest) = rest.strip_prefix(RESPONSE_SEGMENT) else {
        log::debug!("[twin] topic in twin family is neither res nor desired PATCH");
        return Err(Error::TopicNoMatch);
    };

    // Exactly three ASCII decimal digits of status.
    if rest.len() < 3 || !rest[..3].iter().all(u8::is_ascii_digit) {
        return Err(Error::UnexpectedChar);
    }
    let code = (u16::from(rest[0] - b'0') * 10 + u16::from(rest[1] - b'0')) * 10
        + u16::from(rest[2] - b'0');
    let status = Status::from_code(code);

    let (_, query) = split_query(&rest[3..]);
    let request_id = query_param(query, b"$rid").unwrap_or(&[]);
    let version = query_param(query, b"$version");

    let response_type = if request_id.is_empty() {
        // Service-initiated; only sent for an in-band desired update.
        if status != Status::Ok {
            return Err(Error::UnexpectedChar);
        }
        TwinResponseType::DesiredProperties
    } else if version.is_some() {
        TwinResponseType::ReportedProperties
    } else {
        TwinResponseType::Get
    };

    Ok(TwinResponse {
        response_type,
        status,
        request_id,
        version,
    })
}
