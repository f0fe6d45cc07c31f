// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Telemetry publish topics.

use crate::client::HubClient;
use crate::message::MessageProperties;
use nimbus_core::error::{Error, Result};
use nimbus_core::span::ByteWriter;

/// Format the telemetry publish topic into `dst`:
/// `devices/{device_id}[/modules/{module_id}]/messages/events/[{bag}]`.
///
/// When `properties` is given, the bag bytes are appended verbatim (the
/// caller pre-encodes names and values as needed).
pub fn publish_topic<'b>(
    client: &HubClient<'_>,
    properties: Option<&MessageProperties<'_>>,
    dst: &'b mut [u8],
) -> Result<&'b str> {
    let bag = properties.map(MessageProperties::as_bytes).unwrap_or(&[]);

    let mut required = "devices/".len() + client.device_id().len();
    if let Some(module_id) = client.module_id() {
        required += "/modules/".len() + module_id.len();
    }
    required += "/messages/events/".len() + bag.len();
    if dst.len() < required {
        return Err(Error::NotEnoughSpace);
    }

    let mut writer = ByteWriter::new(dst);
    writer.write_slice(b"devices/")?;
    writer.write_slice(client.device_id().as_bytes())?;
    if let Some(module_id) = client.module_id() {
        writer.write_slice(b"/modules/")?;
        writer.write_slice(module_id.as_bytes())?;
    }
    writer.write_slice(b"/messages/events/")?;
    writer.write_slice(bag)?;

    let written = writer.position();
    core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
}
