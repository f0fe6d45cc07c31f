// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Cloud-to-device message topics.

use crate::client::HubClient;
use crate::message::PropertyBag;
use nimbus_core::error::{Error, Result};
use nimbus_core::span::ByteWriter;

const DEVICES_PREFIX: &[u8] = b"devices/";
const DEVICEBOUND_SUFFIX: &[u8] = b"/messages/devicebound/";

/// A parsed cloud-to-device message topic.
#[derive(Debug, Clone, Copy)]
pub struct C2dRequest<'a> {
    /// Application and system properties carried on the topic. Empty for a
    /// metadata-only message.
    pub properties: PropertyBag<'a>,
}

/// Format the cloud-to-device subscribe filter into `dst`:
/// `devices/{device_id}/messages/devicebound/#`.
pub fn subscribe_topic<'b>(client: &HubClient<'_>, dst: &'b mut [u8]) -> Result<&'b str> {
    let required =
        DEVICES_PREFIX.len() + client.device_id().len() + DEVICEBOUND_SUFFIX.len() + 1;
    if dst.len() < required {
        return Err(Error::NotEnoughSpace);
    }

    let mut writer = ByteWriter::new(dst);
    writer.write_slice(DEVICES_PREFIX)?;
    writer.write_slice(client.device_id().as_bytes())?;
    writer.write_slice(DEVICEBOUND_SUFFIX)?;
    writer.write_u8(b'#')?;

    let written = writer.position();
    core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
}

/// Match a received topic against the cloud-to-device family for this
/// client's device.
///
/// Everything after `.../devicebound/` is the property bag; zero bytes is a
/// valid parse. A topic outside the family is [`Error::TopicNoMatch`].
pub fn parse_received_topic<'a>(
    client: &HubClient<'_>,
    topic: &'a [u8],
) -> Result<C2dRequest<'a>> {
    let no_match = || {
        log::debug!("[c2d] received topic is not devicebound");
        Error::TopicNoMatch
    };

    let rest = topic.strip_prefix(DEVICES_PREFIX).ok_or_else(no_match)?;
    let rest = rest
        .strip_prefix(client.device_id().as_bytes())
        .ok_or_else(no_match)?;
    let bag = rest.strip_prefix(DEVICEBOUND_SUFFIX).ok_or_else(no_match)?;

    Ok(C2dRequest {
        properties: PropertyBag::new(bag),
    })
}
