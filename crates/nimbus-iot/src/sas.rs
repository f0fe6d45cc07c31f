// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Shared-access-signature credentials.
//!
//! The device proves possession of its shared key by signing a
//! `{hostname}/devices/{device_id}\n{expiry}` document with HMAC-SHA256 and
//! presenting the Base64, URL-encoded digest inside a
//! `SharedAccessSignature` token as the MQTT password.
//!
//! This module only formats; it never computes a digest on its own. The
//! `crypto` feature adds [`sign_document`] for hosts that want the whole
//! chain in one call.

use nimbus_core::error::{Error, Result};
use nimbus_core::span::numeric::decimal_digits;
use nimbus_core::span::ByteWriter;

const DEVICES_SEGMENT: &str = "/devices/";
const TOKEN_PREFIX: &str = "SharedAccessSignature sr=";

/// Format the string-to-sign document into `dst`:
/// `{hostname}/devices/{device_id}\n{expiry_secs}`.
pub fn document<'b>(
    hostname: &str,
    device_id: &str,
    expiry_secs: u64,
    dst: &'b mut [u8],
) -> Result<&'b str> {
    if hostname.is_empty() || device_id.is_empty() {
        return Err(Error::InvalidArgument);
    }

    let required =
        hostname.len() + DEVICES_SEGMENT.len() + device_id.len() + 1 + decimal_digits(expiry_secs);
    if dst.len() < required {
        return Err(Error::NotEnoughSpace);
    }

    let mut writer = ByteWriter::new(dst);
    writer.write_slice(hostname.as_bytes())?;
    writer.write_slice(DEVICES_SEGMENT.as_bytes())?;
    writer.write_slice(device_id.as_bytes())?;
    writer.write_u8(b'\n')?;
    writer.write_u64(expiry_secs)?;

    let written = writer.position();
    core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
}

/// Assemble the shared-access-signature token into `dst`:
/// `SharedAccessSignature sr={hostname}/devices/{device_id}`
/// `&sig={signature}&se={expiry_secs}[&skn={key_name}]`.
///
/// `signature` is the already URL-encoded Base64 HMAC-SHA256 digest of the
/// [`document`] for the same expiry.
pub fn token<'b>(
    hostname: &str,
    device_id: &str,
    signature: &str,
    expiry_secs: u64,
    key_name: Option<&str>,
    dst: &'b mut [u8],
) -> Result<&'b str> {
    if hostname.is_empty() || device_id.is_empty() || signature.is_empty() {
        return Err(Error::InvalidArgument);
    }

    let mut required = TOKEN_PREFIX.len()
        + hostname.len()
        + DEVICES_SEGMENT.len()
        + device_id.len()
        + "&sig=".len()
        + signature.len()
        + "&se=".len()
        + decimal_digits(expiry_secs);
    if let Some(key_name) = key_name {
        required += "&skn=".len() + key_name.len();
    }
    if dst.len() < required {
        return Err(Error::NotEnoughSpace);
    }

    let mut writer = ByteWriter::new(dst);
    writer.write_slice(TOKEN_PREFIX.as_bytes())?;
    writer.write_slice(hostname.as_bytes())?;
    writer.write_slice(DEVICES_SEGMENT.as_bytes())?;
    writer.write_slice(device_id.as_bytes())?;
    writer.write_slice(b"&sig=")?;
    writer.write_slice(signature.as_bytes())?;
    writer.write_slice(b"&se=")?;
    writer.write_u64(expiry_secs)?;
    if let Some(key_name) = key_name {
        writer.write_slice(b"&skn=")?;
        writer.write_slice(key_name.as_bytes())?;
    }

    let written = writer.position();
    core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
}

/// Sign `document` with HMAC-SHA256 under `key` and write the Base64,
/// URL-encoded digest (the `sig=` value) into `dst`.
///
/// `key` is the raw (already Base64-decoded) shared access key.
#[cfg(feature = "crypto")]
pub fn sign_document<'b>(key: &[u8], document: &[u8], dst: &'b mut [u8]) -> Result<&'b str> {
    use base64::Engine;

    let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key);
    let digest = ring::hmac::sign(&key, document);

    // A 32-byte digest encodes to 44 Base64 characters.
    let mut encoded = [0u8; 44];
    let encoded_len = base64::engine::general_purpose::STANDARD
        .encode_slice(digest.as_ref(), &mut encoded)
        .map_err(|_| Error::NotEnoughSpace)?;

    let written = nimbus_core::span::url_encode(dst, &encoded[..encoded_len])?;
    core::str::from_utf8(&dst[..written]).map_err(|_| Error::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTNAME: &str = "myiothub.azure-devices.net";
    const DEVICE_ID: &str = "mytest_deviceid";
    const EXPIRY: u64 = 1578941692;
    const SIGNATURE: &str = "cS1eHM%2FlDjsRsrZV9508wOFrgmZk4g8FNg8NwHVSiSQ";

    #[test]
    fn test_document() {
        let mut buf = [0u8; 128];
        assert_eq!(
            document(HOSTNAME, DEVICE_ID, EXPIRY, &mut buf).unwrap(),
            "myiothub.azure-devices.net/devices/mytest_deviceid\n1578941692"
        );
    }

    #[test]
    fn test_document_small_buffer() {
        let mut buf = [0u8; 32];
        assert_eq!(
            document(HOSTNAME, DEVICE_ID, EXPIRY, &mut buf),
            Err(Error::NotEnoughSpace)
        );
    }

    #[test]
    fn test_token_without_key_name() {
        let mut buf = [0u8; 256];
        assert_eq!(
            token(HOSTNAME, DEVICE_ID, SIGNATURE, EXPIRY, None, &mut buf).unwrap(),
            "SharedAccessSignature sr=myiothub.azure-devices.net/devices/mytest_deviceid\
             &sig=cS1eHM%2FlDjsRsrZV9508wOFrgmZk4g8FNg8NwHVSiSQ&se=1578941692"
        );
    }

    #[test]
    fn test_token_with_key_name() {
        let mut buf = [0u8; 256];
        assert_eq!(
            token(
                HOSTNAME,
                DEVICE_ID,
                SIGNATURE,
                EXPIRY,
                Some("iothubowner"),
                &mut buf
            )
            .unwrap(),
            "SharedAccessSignature sr=myiothub.azure-devices.net/devices/mytest_deviceid\
             &sig=cS1eHM%2FlDjsRsrZV9508wOFrgmZk4g8FNg8NwHVSiSQ&se=1578941692&skn=iothubowner"
        );
    }

    #[test]
    fn test_token_rejects_empty_arguments() {
        let mut buf = [0u8; 256];
        assert_eq!(
            token("", DEVICE_ID, SIGNATURE, EXPIRY, None, &mut buf),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            token(HOSTNAME, DEVICE_ID, "", EXPIRY, None, &mut buf),
            Err(Error::InvalidArgument)
        );
    }

    #[cfg(feature = "crypto")]
    #[test]
    fn test_sign_document_is_url_safe() {
        let mut doc_buf = [0u8; 128];
        let doc = document(HOSTNAME, DEVICE_ID, EXPIRY, &mut doc_buf).unwrap();

        let mut sig_buf = [0u8; 192];
        let signature = sign_document(b"a-shared-key", doc.as_bytes(), &mut sig_buf).unwrap();

        // Base64 padding and symbols must arrive percent-encoded.
        assert!(!signature.contains('='));
        assert!(!signature.contains('+'));
        assert!(!signature.contains('/'));
        assert!(signature.ends_with("%3D"));
    }
}
