// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Component-aware twin property framing and iteration.
//!
//! Twin payloads group the properties of a sub-device component inside an
//! object marked with `"__t":"c"`. The builder half frames outgoing
//! reported properties that way; the reader half walks an incoming twin
//! document and yields one property at a time, annotated with the
//! component it belongs to.
//!
//! Incoming documents come in two shapes:
//!
//! - desired-only patch: `{ "propA": ..., "$version": N }`
//! - full GET response: `{ "desired": { ..., "$version": N },
//!   "reported": { ... } }`

use crate::client::HubClient;
use crate::twin::TwinResponseType;
use nimbus_core::error::{Error, Result};
use nimbus_core::json::{JsonReader, JsonTokenKind, JsonWriter};

const COMPONENT_MARKER_NAME: &[u8] = b"__t";
const COMPONENT_MARKER_VALUE: &[u8] = b"c";
const VERSION_NAME: &[u8] = b"$version";
const DESIRED_NAME: &[u8] = b"desired";
const REPORTED_NAME: &[u8] = b"reported";

/// Which side of the twin document a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Cloud-writable (desired) properties
    Writeable,
    /// Properties previously reported by the device
    ReportedFromDevice,
}

/// Open a component scope in `writer`: `"name":{"__t":"c"`.
///
/// The writer must be inside an object. User properties of the component
/// follow; close the scope with [`builder_end_component`].
pub fn builder_begin_component(writer: &mut JsonWriter<'_>, name: &[u8]) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument);
    }
    writer.append_property_name(name)?;
    writer.append_begin_object()?;
    writer.append_property_name(COMPONENT_MARKER_NAME)?;
    writer.append_string(COMPONENT_MARKER_VALUE)
}

/// Close a component scope opened by [`builder_begin_component`].
pub fn builder_end_component(writer: &mut JsonWriter<'_>) -> Result<()> {
    writer.append_end_object()
}

/// Open a writeable-property acknowledgement in `writer`:
/// `"name":{"ac":<code>,"av":<version>[,"ad":"<description>"],"value":`.
///
/// The caller appends any JSON value, then calls
/// [`builder_end_response_status`].
pub fn builder_begin_response_status(
    writer: &mut JsonWriter<'_>,
    property_name: &[u8],
    ack_code: i32,
    ack_version: i32,
    ack_description: Option<&[u8]>,
) -> Result<()> {
    if property_name.is_empty() {
        return Err(Error::InvalidArgument);
    }
    writer.append_property_name(property_name)?;
    writer.append_begin_object()?;
    writer.append_property_name(b"ac")?;
    writer.append_int32(ack_code)?;
    writer.append_property_name(b"av")?;
    writer.append_int32(ack_version)?;
    if let Some(description) = ack_description {
        writer.append_property_name(b"ad")?;
        writer.append_string(description)?;
    }
    writer.append_property_name(b"value")
}

/// Close an acknowledgement opened by [`builder_begin_response_status`].
pub fn builder_end_response_status(writer: &mut JsonWriter<'_>) -> Result<()> {
    writer.append_end_object()
}

/// Move the reader from a member position to the value of the member named
/// `name`, skipping other members wholesale.
fn move_to_child(reader: &mut JsonReader<'_>, name: &[u8]) -> Result<()> {
    loop {
        match reader.token().kind() {
            JsonTokenKind::PropertyName => {
                if reader.token().is_text_equal(name) {
                    reader.next_token()?;
                    return Ok(());
                }
                reader.next_token()?;
                if matches!(
                    reader.token().kind(),
                    JsonTokenKind::BeginObject | JsonTokenKind::BeginArray
                ) {
                    reader.skip_children()?;
                }
                reader.next_token()?;
            }
            JsonTokenKind::EndObject => return Err(Error::ItemNotFound),
            _ => return Err(Error::JsonUnexpectedToken),
        }
    }
}

/// Extract the `$version` value from a twin document.
///
/// For a [`TwinResponseType::Get`] document the version lives inside the
/// `desired` subtree; for a [`TwinResponseType::DesiredProperties`] patch
/// it is a root member. The reader must be freshly initialized and is
/// rewound to the start of the document before returning, so the caller
/// can iterate immediately.
pub fn properties_version(
    reader: &mut JsonReader<'_>,
    response_type: TwinResponseType,
) -> Result<i32> {
    if response_type == TwinResponseType::ReportedProperties {
        return Err(Error::InvalidArgument);
    }

    reader.next_token()?;
    if reader.token().kind() != JsonTokenKind::BeginObject {
        return Err(Error::UnexpectedChar);
    }
    reader.next_token()?;

    if response_type == TwinResponseType::Get {
        move_to_child(reader, DESIRED_NAME)?;
        if reader.token().kind() != JsonTokenKind::BeginObject {
            return Err(Error::JsonUnexpectedToken);
        }
        reader.next_token()?;
    }

    move_to_child(reader, VERSION_NAME)?;
    let version = reader.token().as_i32()?;

    reader.restart();
    Ok(version)
}

/// Iterator over the properties of a twin document, in document order,
/// annotated with the component each belongs to.
///
/// Each successful [`next_property`](Self::next_property) call leaves the
/// reader positioned on the property-name token and returns the component
/// name (`None` for a root-scoped property). Before the next call the
/// caller must advance the reader past the value: read it with
/// `next_token`, or skip a container value with `skip_children` followed
/// by `next_token`. Calling again from a value position fails with
/// [`Error::JsonInvalidState`].
///
/// `"__t"` markers and `"$version"` are skipped transparently. When the
/// relevant subtree is exhausted the iterator reports
/// [`Error::EndOfTwinProperties`].
pub struct ComponentPropertyIter<'cl, 'r, 'a> {
    client: &'cl HubClient<'cl>,
    reader: &'r mut JsonReader<'a>,
    response_type: TwinResponseType,
    property_kind: PropertyKind,
    current_component: Option<usize>,
}

impl<'cl, 'r, 'a> ComponentPropertyIter<'cl, 'r, 'a> {
    /// Start iterating `reader` as a document of the given shape.
    ///
    /// Reported properties only exist in a full GET document; requesting
    /// [`PropertyKind::ReportedFromDevice`] out of a desired-properties
    /// patch is [`Error::InvalidArgument`].
    pub fn new(
        client: &'cl HubClient<'cl>,
        reader: &'r mut JsonReader<'a>,
        response_type: TwinResponseType,
        property_kind: PropertyKind,
    ) -> Result<Self> {
        let supported = match response_type {
            TwinResponseType::Get => true,
            TwinResponseType::DesiredProperties => property_kind == PropertyKind::Writeable,
            TwinResponseType::ReportedProperties => false,
        };
        if !supported {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            client,
            reader,
            response_type,
            property_kind,
            current_component: None,
        })
    }

    /// The underlying JSON reader, for reading or skipping the value of
    /// the property most recently yielded.
    pub fn reader(&mut self) -> &mut JsonReader<'a> {
        &mut *self.reader
    }

    /// Container depth at which top-level property names live.
    const fn scope_depth(&self) -> usize {
        match self.response_type {
            // Root object members.
            TwinResponseType::DesiredProperties => 1,
            // Members of the desired/reported subtree object.
            _ => 2,
        }
    }

    fn match_component(&self) -> Option<usize> {
        self.client
            .component_names()
            .iter()
            .position(|name| self.reader.token().is_text_equal(name.as_bytes()))
    }

    /// Skip the member the reader is positioned on (name and value) and
    /// move to the next member position.
    fn skip_pair(&mut self) -> Result<()> {
        self.reader.next_token()?;
        if matches!(
            self.reader.token().kind(),
            JsonTokenKind::BeginObject | JsonTokenKind::BeginArray
        ) {
            self.reader.skip_children()?;
        }
        self.reader.next_token()?;
        Ok(())
    }

    /// First call: enter the document and navigate to the property scope.
    fn enter_document(&mut self) -> Result<()> {
        self.reader.next_token()?;
        if self.reader.token().kind() != JsonTokenKind::BeginObject {
            return Err(Error::UnexpectedChar);
        }
        self.reader.next_token()?;

        if self.response_type == TwinResponseType::Get {
            let subtree = match self.property_kind {
                PropertyKind::Writeable => DESIRED_NAME,
                PropertyKind::ReportedFromDevice => REPORTED_NAME,
            };
            move_to_child(self.reader, subtree)?;
            if self.reader.token().kind() != JsonTokenKind::BeginObject {
                return Err(Error::JsonUnexpectedToken);
            }
            self.reader.next_token()?;
        }
        Ok(())
    }

    /// Advance to the next property.
    ///
    /// On success the reader sits on the property-name token; the returned
    /// value is the owning component (`None` for root scope). The end of
    /// the subtree is reported as [`Error::EndOfTwinProperties`].
    pub fn next_property(&mut self) -> Result<Option<&'cl str>> {
        let scope = self.scope_depth();
        loop {
            match self.reader.token().kind() {
                JsonTokenKind::None => self.enter_document()?,
                JsonTokenKind::PropertyName => {
                    let depth = self.reader.depth();
                    if depth == scope {
                        if self.reader.token().is_text_equal(VERSION_NAME) {
                            self.skip_pair()?;
                            continue;
                        }
                        if let Some(index) = self.match_component() {
                            self.reader.next_token()?;
                            if self.reader.token().kind() != JsonTokenKind::BeginObject {
                                return Err(Error::JsonUnexpectedToken);
                            }
                            self.current_component = Some(index);
                            self.reader.next_token()?;
                            continue;
                        }
                        self.current_component = None;
                        return Ok(None);
                    }
                    if depth == scope + 1 {
                        let Some(index) = self.current_component else {
                            return Err(Error::JsonInvalidState);
                        };
                        if self.reader.token().is_text_equal(COMPONENT_MARKER_NAME) {
                            self.skip_pair()?;
                            continue;
                        }
                        return Ok(Some(self.client.component_names()[index]));
                    }
                    return Err(Error::JsonInvalidState);
                }
                JsonTokenKind::EndObject => {
                    let depth = self.reader.depth();
                    if depth + 1 == scope {
                        // The property scope itself closed; for a GET the
                        // sibling subtree is never scanned.
                        return Err(Error::EndOfTwinProperties);
                    }
                    if depth == scope {
                        // Component close, or a skipped root-scope object
                        // value.
                        self.current_component = None;
                        self.reader.next_token()?;
                    } else if depth == scope + 1 && self.current_component.is_some() {
                        // Skipped object value inside the component.
                        self.reader.next_token()?;
                    } else {
                        return Err(Error::JsonInvalidState);
                    }
                }
                JsonTokenKind::EndArray => {
                    let depth = self.reader.depth();
                    let in_component = self.current_component.is_some();
                    if (depth == scope && !in_component)
                        || (depth == scope + 1 && in_component)
                    {
                        // Skipped array value.
                        self.reader.next_token()?;
                    } else {
                        return Err(Error::JsonInvalidState);
                    }
                }
                _ => return Err(Error::JsonInvalidState),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HubClientOptions;

    const HOSTNAME: &str = "myiothub.azure-devices.net";
    const DEVICE_ID: &str = "my_device";

    fn component_client() -> HubClient<'static> {
        let options = HubClientOptions {
            component_names: &["component_one", "component_two"],
            ..HubClientOptions::default()
        };
        HubClient::new(HOSTNAME, DEVICE_ID, Some(options)).unwrap()
    }

    #[test]
    fn test_builder_begin_component() {
        let mut buf = [0u8; 100];
        let mut writer = JsonWriter::new(&mut buf, None);
        writer.append_begin_object().unwrap();
        builder_begin_component(&mut writer, b"component_one").unwrap();
        assert_eq!(writer.as_written(), b"{\"component_one\":{\"__t\":\"c\"");
    }

    #[test]
    fn test_builder_end_component() {
        let mut buf = [0u8; 100];
        let mut writer = JsonWriter::new(&mut buf, None);
        writer.append_begin_object().unwrap();
        builder_begin_component(&mut writer, b"component_one").unwrap();
        builder_end_component(&mut writer).unwrap();
        assert_eq!(writer.as_written(), b"{\"component_one\":{\"__t\":\"c\"}");
    }

    #[test]
    fn test_builder_component_with_user_data() {
        let mut buf = [0u8; 100];
        let mut writer = JsonWriter::new(&mut buf, None);
        writer.append_begin_object().unwrap();
        builder_begin_component(&mut writer, b"component_one").unwrap();
        writer.append_property_name(b"prop").unwrap();
        writer.append_int32(100).unwrap();
        builder_end_component(&mut writer).unwrap();
        assert_eq!(
            writer.as_written(),
            b"{\"component_one\":{\"__t\":\"c\",\"prop\":100}"
        );
    }

    #[test]
    fn test_builder_response_status() {
        let mut buf = [0u8; 128];
        let mut writer = JsonWriter::new(&mut buf, None);
        writer.append_begin_object().unwrap();
        builder_begin_response_status(&mut writer, b"targetTemperature", 200, 29, Some(&b"success"[..]))
            .unwrap();
        assert_eq!(
            writer.as_written(),
            &b"{\"targetTemperature\":{\"ac\":200,\"av\":29,\"ad\":\"success\",\"value\":"[..]
        );

        writer.append_int32(50).unwrap();
        builder_end_response_status(&mut writer).unwrap();
        writer.append_end_object().unwrap();
        assert_eq!(
            writer.as_written(),
            &b"{\"targetTemperature\":{\"ac\":200,\"av\":29,\"ad\":\"success\",\"value\":50}}"[..]
        );
    }

    #[test]
    fn test_builder_response_status_inside_component() {
        let mut buf = [0u8; 256];
        let mut writer = JsonWriter::new(&mut buf, None);
        writer.append_begin_object().unwrap();
        builder_begin_component(&mut writer, b"component_one").unwrap();
        builder_begin_response_status(&mut writer, b"targetTemperature", 200, 5, Some(&b"success"[..]))
            .unwrap();
        writer.append_int32(23).unwrap();
        builder_end_response_status(&mut writer).unwrap();
        builder_end_component(&mut writer).unwrap();
        writer.append_end_object().unwrap();
        assert_eq!(
            writer.as_written(),
            &b"{\"component_one\":{\"__t\":\"c\",\"targetTemperature\":{\"ac\":200,\"av\":5,\
\"ad\":\"success\",\"value\":23}}}"[..]
        );
    }

    #[test]
    fn test_version_from_desired_patch() {
        let payload = b"{\"component_one\":{\"prop_one\":1,\"prop_two\":\"string\"},\
\"component_two\":{\"prop_three\":45,\"prop_four\":\"string\"},\
\"not_component\":42,\"$version\":5}";
        let mut reader = JsonReader::new(payload, None).unwrap();
        let version =
            properties_version(&mut reader, TwinResponseType::DesiredProperties).unwrap();
        assert_eq!(version, 5);

        // The reader was rewound; iteration can start from scratch.
        reader.next_token().unwrap();
        assert_eq!(reader.token().kind(), JsonTokenKind::BeginObject);
    }

    #[test]
    fn test_version_from_get_document() {
        let payload = b"{\"desired\":{\"thermostat1\":{\"__t\":\"c\",\
\"targetTemperature\":47},\"$version\":4},\"reported\":{\"manufacturer\":\"Contoso\"}}";
        let mut reader = JsonReader::new(payload, None).unwrap();
        assert_eq!(
            properties_version(&mut reader, TwinResponseType::Get).unwrap(),
            4
        );
    }

    #[test]
    fn test_version_from_out_of_order_get_document() {
        let payload = b"{\"reported\":{\"manufacturer\":\"Contoso\"},\
\"desired\":{\"$version\":4,\"thermostat1\":{\"targetTemperature\":47,\"__t\":\"c\"}}}";
        let mut reader = JsonReader::new(payload, None).unwrap();
        assert_eq!(
            properties_version(&mut reader, TwinResponseType::Get).unwrap(),
            4
        );
    }

    #[test]
    fn test_version_rejects_reported_response_type() {
        let mut reader = JsonReader::new(b"{}", None).unwrap();
        assert_eq!(
            properties_version(&mut reader, TwinResponseType::ReportedProperties),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn test_iter_rejects_reported_kind_for_desired_patch() {
        let client = component_client();
        let mut reader = JsonReader::new(b"{}", None).unwrap();
        assert!(ComponentPropertyIter::new(
            &client,
            &mut reader,
            TwinResponseType::DesiredProperties,
            PropertyKind::ReportedFromDevice,
        )
        .is_err());
    }
}
