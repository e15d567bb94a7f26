//! # Data URIs
//!
//! Wraps arbitrary bytes (typically an uploaded image) as an RFC 2397
//! `data:<mime>;base64,<payload>` URI and parses such URIs back. Only the
//! Base64 form is accepted; the payload goes through [`codec::decode`] so
//! alphabet and padding rules are identical to the Base64 tool.

use serde::{Deserialize, Serialize};

use crate::codec::{self, Format};
use crate::error::{Result, ToolError};

const FALLBACK_MIME: &str = "application/octet-stream";

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataUri {
    /// Declared media type, e.g. `image/png`.
    pub mime: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Build a data URI. When `mime` is `None` the type is sniffed from
/// the leading bytes.
pub fn encode(bytes: &[u8], mime: Option<&str>) -> String {
    let mime = mime.map(str::trim).filter(|m| !m.is_empty()).unwrap_or_else(|| sniff_mime(bytes));
    format!("data:{mime};base64,{}", codec::encode(bytes, Format::Base64))
}

/// Parse a Base64 data URI.
///
/// # Errors
///
/// [`ToolError::MalformedInput`] when the `data:` prefix, the `;base64`
/// marker, or the comma separator is missing, or the payload is not valid
/// Base64.
pub fn decode(uri: &str) -> Result<DataUri> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ToolError::malformed("data-uri", "missing data: prefix"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ToolError::malformed("data-uri", "missing ',' separator"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| ToolError::malformed("data-uri", "only base64 data URIs are supported"))?;
    let mime = if mime.is_empty() { "text/plain" } else { mime };
    let bytes = codec::decode(payload, Format::Base64)?;
    Ok(DataUri {
        mime: mime.to_string(),
        bytes,
    })
}

/// Guess a media type from magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    const SIGNATURES: [(&[u8], &str); 4] = [
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
    ];
    if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| bytes.starts_with(magic)) {
        return *mime;
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return "image/webp";
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return "image/svg+xml";
    }
    FALLBACK_MIME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_with_explicit_mime() {
        let uri = encode(b"fake image data", Some("image/png"));
        assert_eq!(uri, "data:image/png;base64,ZmFrZSBpbWFnZSBkYXRh");
    }

    #[test]
    fn encode_sniffs_png() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert!(encode(png, None).starts_with("data:image/png;base64,"));
    }

    #[test]
    fn sniff_known_types() {
        assert_eq!(sniff_mime(b"GIF89a...."), "image/gif");
        assert_eq!(sniff_mime(b"\xff\xd8\xff\xe0"), "image/jpeg");
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"  <svg xmlns='http://www.w3.org/2000/svg'/>"), "image/svg+xml");
        assert_eq!(sniff_mime(b"plain"), FALLBACK_MIME);
    }

    #[test]
    fn decode_roundtrip() {
        let uri = encode(b"gif data", Some("image/gif"));
        let parsed = decode(&uri).unwrap();
        assert_eq!(parsed.mime, "image/gif");
        assert_eq!(parsed.bytes, b"gif data");
    }

    #[test]
    fn decode_rejects_non_base64_forms() {
        assert!(decode("image/png;base64,AAAA").is_err());
        assert!(decode("data:text/plain,hello").is_err());
        assert!(decode("data:image/png;base64").is_err());
        assert!(decode("data:image/png;base64,***").is_err());
    }

    #[test]
    fn decode_defaults_empty_mime() {
        let parsed = decode("data:;base64,aGk=").unwrap();
        assert_eq!(parsed.mime, "text/plain");
        assert_eq!(parsed.bytes, b"hi");
    }
}
