// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Hub connection state and MQTT identity formatters.
//!
//! [`HubClient`] stores borrowed references to the caller-provided identity
//! strings and is immutable after construction; every topic builder and
//! parser in the crate is a pure function over it.

use crate::{API_VERSION, DEFAULT_USER_AGENT};
use nimbus_core::error::{Error, Result};
use nimbus_core::span::{url_encoded_len, ByteWriter};

// Advertised when the method/twin content type is CBOR; the value is
// pre-encoded for the user-name query.
const CONTENT_TYPE_CBOR_PARAMETER: &str = "default-content-type=application%2Fcbor";

/// Payload encoding advertised for method and twin exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodTwinContentType {
    /// JSON payloads (the service default; nothing is advertised)
    #[default]
    Json,
    /// CBOR payloads, advertised through the user-name query
    Cbor,
}

/// Optional pieces of the hub connection identity.
#[derive(Debug, Clone, Copy)]
pub struct HubClientOptions<'a> {
    /// Module identity under the device, when connecting as a module
    pub module_id: Option<&'a str>,
    /// User-agent fragment appended to the MQTT user name
    pub user_agent: &'a str,
    /// Digital-twin model id (DTMI); URL-encoded into the user name
    pub model_id: Option<&'a str>,
    /// Payload encoding advertised for method/twin exchanges
    pub method_twin_content_type: MethodTwinContentType,
    /// Component names recognized by the twin properties layer
    pub component_names: &'a [&'a str],
}

impl Default for HubClientOptions<'_> {
    fn default() -> Self {
        Self {
            module_id: None,
            user_agent: DEFAULT_USER_AGENT,
            model_id: None,
            method_twin_content_type: MethodTwinContentType::Json,
            component_names: &[],
        }
    }
}

/// Immutable hub client state.
///
/// All referenced strings must outlive the client; nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct HubClient<'a> {
    hostname: &'a str,
    device_id: &'a str,
    options: HubClientOptions<'a>,
}

impl<'a> HubClient<'a> {
    /// Create a client for `device_id` on the hub at `hostname`.
    ///
    /// Both identifiers must be non-empty.
    pub fn new(
        hostname: &'a str,
        device_id: &'a str,
        options: Option<HubClientOptions<'a>>,
    ) -> Result<Self> {
        if hostname.is_empty() || device_id.is_empty() {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            hostname,
            device_id,
            options: options.unwrap_or_default(),
        })
    }

    /// Hub hostname.
    pub const fn hostname(&self) -> &'a str {
        self.hostname
    }

    /// Device identity.
    pub const fn device_id(&self) -> &'a str {
        self.device_id
    }

    /// Module identity, when connecting as a module.
    pub const fn module_id(&self) -> Option<&'a str> {
        self.options.module_id
    }

    /// Component names recognized by the properties layer.
    pub const fn component_names(&self) -> &'a [&'a str] {
        self.options.component_names
    }

    /// Format the MQTT user name into `dst`.
    ///
    /// `{hostname}/{device_id}[/{module_id}]/?api-version=<v>[&<user_agent>]`
    /// `[&default-content-type=application%2Fcbor][&model-id=<encoded>]`,
    /// with the query parameters in exactly that order.
    pub fn user_name<'b>(&self, dst: &'b mut [u8]) -> Result<&'b str> {
        let mut required = self.hostname.len() + 1 + self.device_id.len();
        if let Some(module_id) = self.options.module_id {
            required += 1 + module_id.len();
        }
        required += 2 + "api-version=".len() + API_VERSION.len();
        if !self.options.user_agent.is_empty() {
            required += 1 + self.options.user_agent.len();
        }
        if self.options.method_twin_content_type == MethodTwinContentType::Cbor {
            required += 1 + CONTENT_TYPE_CBOR_PARAMETER.len();
        }
        if let Some(model_id) = self.options.model_id {
            required += 1 + "model-id=".len() + url_encoded_len(model_id.as_bytes());
        }
        if dst.len() < required {
            return Err(Error::NotEnoughSpace);
        }

        let mut writer = ByteWriter::new(dst);
        writer.write_slice(self.hostname.as_bytes())?;
        writer.write_u8(b'/')?;
        writer.write_slice(self.device_id.as_bytes())?;
        if let Some(module_id) = self.options.module_id {
            writer.write_u8(b'/')?;
            writer.write_slice(module_id.as_bytes())?;
        }
        writer.write_slice(b"/?api-version=")?;
        writer.write_slice(API_VERSION.as_bytes())?;
        if !self.options.user_agent.is_empty() {
            writer.write_u8(b'&')?;
            writer.write_slice(self.options.user_agent.as_bytes())?;
        }
        if self.options.method_twin_content_type == MethodTwinContentType::Cbor {
            writer.write_u8(b'&')?;
            writer.write_slice(CONTENT_TYPE_CBOR_PARAMETER.as_bytes())?;
        }
        if let Some(model_id) = self.options.model_id {
            writer.write_slice(b"&model-id=")?;
            writer.write_url_encoded(model_id.as_bytes())?;
        }

        let written = writer.position();
        core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
    }

    /// Format the MQTT client id into `dst`:
    /// `{device_id}[/{module_id}]`.
    pub fn client_id<'b>(&self, dst: &'b mut [u8]) -> Result<&'b str> {
        let mut required = self.device_id.len();
        if let Some(module_id) = self.options.module_id {
            required += 1 + module_id.len();
        }
        if dst.len() < required {
            return Err(Error::NotEnoughSpace);
        }

        let mut writer = ByteWriter::new(dst);
        writer.write_slice(self.device_id.as_bytes())?;
        if let Some(module_id) = self.options.module_id {
            writer.write_u8(b'/')?;
            writer.write_slice(module_id.as_bytes())?;
        }

        let written = writer.position();
        core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTNAME: &str = "myiothub.azure-devices.net";
    const DEVICE_ID: &str = "my_device";
    const MODULE_ID: &str = "my_module_id";
    const USER_AGENT: &str = "os=azrtos";
    const MODEL_ID: &str = "dtmi:YOUR_COMPANY_NAME_HERE:sample_device;1";
    const MODEL_ID_PARAMETER: &str =
        "model-id=dtmi%3AYOUR_COMPANY_NAME_HERE%3Asample_device%3B1";

    fn module_options() -> HubClientOptions<'static> {
        HubClientOptions {
            module_id: Some(MODULE_ID),
            user_agent: USER_AGENT,
            ..HubClientOptions::default()
        }
    }

    #[test]
    fn test_init_rejects_empty_identity() {
        assert!(HubClient::new("", DEVICE_ID, None).is_err());
        assert!(HubClient::new(HOSTNAME, "", None).is_err());
    }

    #[test]
    fn test_user_name_default_options() {
        let client = HubClient::new(HOSTNAME, DEVICE_ID, None).unwrap();
        let mut buf = [0u8; 256];
        let user_name = client.user_name(&mut buf).unwrap();
        let expected = [
            HOSTNAME,
            "/",
            DEVICE_ID,
            "/?api-version=2020-09-30&",
            crate::DEFAULT_USER_AGENT,
        ]
        .concat();
        assert_eq!(user_name, expected);
    }

    #[test]
    fn test_user_name_with_module_and_user_agent() {
        let client = HubClient::new(HOSTNAME, DEVICE_ID, Some(module_options())).unwrap();
        let mut buf = [0u8; 256];
        assert_eq!(
            client.user_name(&mut buf).unwrap(),
            "myiothub.azure-devices.net/my_device/my_module_id/?api-version=2020-09-30&os=azrtos"
        );
    }

    #[test]
    fn test_user_name_with_cbor_content_type() {
        let options = HubClientOptions {
            method_twin_content_type: MethodTwinContentType::Cbor,
            ..HubClientOptions::default()
        };
        let client = HubClient::new(HOSTNAME, DEVICE_ID, Some(options)).unwrap();
        let mut buf = [0u8; 256];
        let user_name = client.user_name(&mut buf).unwrap();
        assert!(user_name.ends_with("&default-content-type=application%2Fcbor"));
    }

    #[test]
    fn test_user_name_with_model_id_is_url_encoded() {
        let options = HubClientOptions {
            model_id: Some(MODEL_ID),
            ..HubClientOptions::default()
        };
        let client = HubClient::new(HOSTNAME, DEVICE_ID, Some(options)).unwrap();
        let mut buf = [0u8; 256];
        let user_name = client.user_name(&mut buf).unwrap();
        assert!(user_name.ends_with(&format!("&{MODEL_ID_PARAMETER}")));
    }

    #[test]
    fn test_user_name_query_ordering_with_all_options() {
        let options = HubClientOptions {
            module_id: Some(MODULE_ID),
            user_agent: USER_AGENT,
            model_id: Some(MODEL_ID),
            method_twin_content_type: MethodTwinContentType::Cbor,
            component_names: &[],
        };
        let client = HubClient::new(HOSTNAME, DEVICE_ID, Some(options)).unwrap();
        let mut buf = [0u8; 256];
        assert_eq!(
            client.user_name(&mut buf).unwrap(),
            format!(
                "{HOSTNAME}/{DEVICE_ID}/{MODULE_ID}/?api-version=2020-09-30&{USER_AGENT}\
                 &default-content-type=application%2Fcbor&{MODEL_ID_PARAMETER}"
            )
        );
    }

    #[test]
    fn test_user_name_small_buffer_fails() {
        let client = HubClient::new(HOSTNAME, DEVICE_ID, None).unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(client.user_name(&mut buf), Err(Error::NotEnoughSpace));
        // Destination untouched on failure.
        assert_eq!(buf, [0u8; 16]);
    }

    #[test]
    fn test_client_id() {
        let client = HubClient::new(HOSTNAME, DEVICE_ID, None).unwrap();
        let mut buf = [0u8; 64];
        assert_eq!(client.client_id(&mut buf).unwrap(), "my_device");

        let client = HubClient::new(HOSTNAME, DEVICE_ID, Some(module_options())).unwrap();
        assert_eq!(client.client_id(&mut buf).unwrap(), "my_device/my_module_id");

        let mut small = [0u8; 4];
        assert_eq!(client.client_id(&mut small), Err(Error::NotEnoughSpace));
    }
}
