//! # Codec Primitives — Byte ⇄ Text Encodings
//!
//! Encode and decode byte sequences under one declared [`Format`]. Every
//! encoder is total and uses exactly one canonical alphabet and padding
//! choice per format, so `decode(encode(b, f), f) == b` holds for every
//! byte sequence `b`.
//!
//! | Format | Alphabet | Padding on encode | Decode leniency |
//! |---|---|---|---|
//! | `base64` | RFC 4648 standard | `=` to a multiple of 4 | none |
//! | `base64url` | RFC 4648 URL-safe | none | padding optional |
//! | `base32` | RFC 4648 | `=` to a multiple of 8 | case-insensitive |
//! | `base58` | Bitcoin (no `0OIl`) | n/a | none |
//! | `hex` | lowercase | n/a | case-insensitive |
//! | `url` | unreserved `A-Za-z0-9-_.~` kept | n/a | literal bytes kept |
//! | `html` | `& < > " '` to named entities | n/a | unknown entities kept |
//!
//! Surrounding ASCII whitespace is ignored when decoding the radix formats
//! (`base64`, `base64url`, `base32`, `base58`, `hex`); anything inside is
//! rejected as [`ToolError::MalformedInput`].

use std::collections::BTreeMap;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use percent_encoding::{percent_decode, percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// URL-safe Base64 that never pads on encode and accepts padded or
/// unpadded input on decode.
const BASE64_URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Everything except the RFC 3986 unreserved set is percent-encoded.
const URL_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Entities produced by HTML escaping, in decode lookup order.
const HTML_ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// A byte-to-text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// RFC 4648 Base64 with `=` padding.
    Base64,
    /// RFC 4648 URL-safe Base64, unpadded.
    Base64Url,
    /// RFC 4648 Base32 with `=` padding.
    Base32,
    /// Bitcoin-alphabet Base58.
    Base58,
    /// Lowercase hexadecimal.
    Hex,
    /// Percent-encoding of every octet outside the unreserved set.
    Url,
    /// HTML entity escaping of `& < > " '`.
    Html,
}

impl Format {
    /// Every supported format, in display order.
    pub const ALL: [Format; 7] = [
        Format::Base64,
        Format::Base64Url,
        Format::Base32,
        Format::Base58,
        Format::Hex,
        Format::Url,
        Format::Html,
    ];

    /// Returns the format identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Base64Url => "base64url",
            Self::Base32 => "base32",
            Self::Base58 => "base58",
            Self::Hex => "hex",
            Self::Url => "url",
            Self::Html => "html",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        Format::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| ToolError::Unsupported(format!("unknown encoding format {s:?}")))
    }
}

/// Encode bytes as text under `format`.
///
/// Total for every input. For [`Format::Html`] the bytes are interpreted as
/// UTF-8; invalid sequences are replaced with U+FFFD before escaping.
pub fn encode(bytes: &[u8], format: Format) -> String {
    match format {
        Format::Base64 => STANDARD.encode(bytes),
        Format::Base64Url => BASE64_URL_LENIENT.encode(bytes),
        Format::Base32 => data_encoding::BASE32.encode(bytes),
        Format::Base58 => bs58::encode(bytes).into_string(),
        Format::Hex => hex::encode(bytes),
        Format::Url => percent_encode(bytes, URL_ESCAPE_SET).to_string(),
        Format::Html => html_escape(&String::from_utf8_lossy(bytes)),
    }
}

/// Decode text produced under `format` back into bytes.
///
/// # Errors
///
/// Returns [`ToolError::MalformedInput`] on characters outside the
/// alphabet, malformed padding, or truncated/invalid percent escapes.
/// The empty string always decodes to an empty byte sequence.
pub fn decode(text: &str, format: Format) -> Result<Vec<u8>> {
    let tag = format.as_str();
    match format {
        Format::Base64 => STANDARD
            .decode(text.trim())
            .map_err(|e| ToolError::malformed(tag, e.to_string())),
        Format::Base64Url => BASE64_URL_LENIENT
            .decode(text.trim())
            .map_err(|e| ToolError::malformed(tag, e.to_string())),
        Format::Base32 => data_encoding::BASE32
            .decode(text.trim().to_ascii_uppercase().as_bytes())
            .map_err(|e| ToolError::malformed(tag, e.to_string())),
        Format::Base58 => bs58::decode(text.trim())
            .into_vec()
            .map_err(|e| ToolError::malformed(tag, e.to_string())),
        Format::Hex => hex::decode(text.trim()).map_err(|e| ToolError::malformed(tag, e.to_string())),
        Format::Url => url_unescape(text),
        Format::Html => Ok(html_unescape(text).into_bytes()),
    }
}

/// Encode UTF-8 text; convenience for text-only callers.
pub fn encode_str(text: &str, format: Format) -> String {
    encode(text.as_bytes(), format)
}

/// Decode into UTF-8 text.
///
/// # Errors
///
/// Everything [`decode`] rejects, plus decoded bytes that are not valid UTF-8.
pub fn decode_to_string(text: &str, format: Format) -> Result<String> {
    let bytes = decode(text, format)?;
    String::from_utf8(bytes)
        .map_err(|e| ToolError::malformed(format.as_str(), format!("decoded bytes are not UTF-8: {e}")))
}

/// Encode `bytes` under every supported format at once.
pub fn encode_all(bytes: &[u8]) -> BTreeMap<Format, String> {
    Format::ALL.into_iter().map(|f| (f, encode(bytes, f))).collect()
}

/// Validate every `%` escape, then percent-decode.
fn url_unescape(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3).ok_or_else(|| {
                ToolError::malformed("url", format!("truncated escape at offset {i}"))
            })?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return Err(ToolError::malformed(
                    "url",
                    format!("invalid escape at offset {i}"),
                ));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(percent_decode(bytes).collect())
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match HTML_ENTITIES.iter().find(|(_, raw)| *raw == c) {
            Some((entity, _)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Single left-to-right pass so `&amp;lt;` decodes to `&lt;`, not `<`.
fn html_unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match HTML_ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, raw)) => {
                out.push(*raw);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
