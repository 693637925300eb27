//! Payload transform for `send_data`.
//!
//! Text crosses the native boundary as base64: UTF-8 text is encoded before
//! the call and the reply is decoded back to text afterwards.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::warn;

use crate::Result;

/// Encodes UTF-8 text as standard padded base64.
pub(crate) fn encode_payload(data: &str) -> String {
    STANDARD.encode(data.as_bytes())
}

/// Decodes a base64 reply back to text.
///
/// Malformed base64 is an error. Bytes that are not valid UTF-8 are replaced
/// with U+FFFD.
pub(crate) fn decode_payload(data: &str) -> Result<String> {
    let bytes = STANDARD.decode(data)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            warn!("Invalid UTF-8 in send_data response: {}", e.utf8_error());
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}
