//! Preview encoding: raw image bytes → base64 data-URI.
//!
//! The original bytes are embedded unchanged rather than re-encoded: the
//! preview must show exactly what was uploaded, and re-encoding a JPEG as
//! PNG would inflate it well past the preview ceiling.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Encode `bytes` as a `data:<mime>;base64,…` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    format!("data:{mime};base64,{b64}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_prefix_and_payload() {
        let uri = data_uri("image/png", &[0x89, b'P', b'N', b'G']);
        assert!(uri.starts_with("data:image/png;base64,"));
        let payload = uri.trim_start_matches("data:image/png;base64,");
        assert_eq!(STANDARD.decode(payload).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }
}
