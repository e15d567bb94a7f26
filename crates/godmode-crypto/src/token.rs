//! # Compact Token Decoder and Verifier
//!
//! Handles the three-segment `header.payload.signature` tokens used by JWT:
//! each segment is unpadded Base64url, the header and payload are JSON.
//!
//! ## Security Invariant
//!
//! Decoding and verification are separate operations. [`decode`] never
//! needs a key and never claims authenticity: its result only says what the
//! token *asserts*. [`verify`] is the only path to a `true` answer, and
//!
//! - `alg: none` never verifies,
//! - a key of the wrong kind for the declared algorithm never verifies,
//! - HMAC tags are compared in constant time.
//!
//! Expiry claims (`exp`, `nbf`, `iat`) are reported by [`claims_status`] as
//! information only; they do not influence [`verify`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use godmode_core::codec::{self, Format};
use godmode_core::{Result, Timestamp, ToolError};
use serde::Serialize;
use serde_json::{json, Map, Value};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::digest;

/// A token split into its parts. Produced by [`decode`]; says nothing about
/// authenticity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token3Part {
    /// Decoded header object.
    pub header: Value,
    /// Decoded payload (claims).
    pub payload: Value,
    /// Raw signature bytes; empty for unsigned tokens.
    #[serde(serialize_with = "serialize_hex")]
    pub signature: Vec<u8>,
    /// Header segment exactly as received.
    pub raw_header: String,
    /// Payload segment exactly as received.
    pub raw_payload: String,
    /// Always `false`. Only [`verify`] checks signatures.
    pub verified: bool,
}

impl Token3Part {
    /// The header's `alg` value, if present and a string.
    pub fn algorithm(&self) -> Option<&str> {
        self.header.get("alg").and_then(Value::as_str)
    }

    /// `header.payload`, the bytes a signature covers.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.raw_header, self.raw_payload)
    }
}

fn serialize_hex<S: serde::Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

/// Split and decode a compact token without verifying it.
///
/// # Errors
///
/// [`ToolError::MalformedInput`] unless the token has exactly three
/// segments, the first two decode as Base64url JSON, the header is an
/// object, and the signature segment is valid Base64url.
pub fn decode(token: &str) -> Result<Token3Part> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [raw_header, raw_payload, raw_signature] = segments.as_slice() else {
        return Err(ToolError::malformed(
            "token",
            format!("expected 3 dot-separated segments, found {}", segments.len()),
        ));
    };

    let header = segment_json(raw_header, "header")?;
    if !header.is_object() {
        return Err(ToolError::malformed("token", "header is not a JSON object"));
    }
    let payload = segment_json(raw_payload, "payload")?;
    let signature = codec::decode(raw_signature, Format::Base64Url)
        .map_err(|_| ToolError::malformed("token", "signature is not valid Base64url"))?;

    tracing::trace!(
        alg = header.get("alg").and_then(serde_json::Value::as_str).unwrap_or("?"),
        signature_len = signature.len(),
        "decoded token"
    );
    Ok(Token3Part {
        header,
        payload,
        signature,
        raw_header: raw_header.to_string(),
        raw_payload: raw_payload.to_string(),
        verified: false,
    })
}

fn segment_json(segment: &str, part: &str) -> Result<Value> {
    let bytes = codec::decode(segment, Format::Base64Url)
        .map_err(|_| ToolError::malformed("token", format!("{part} is not valid Base64url")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ToolError::malformed("token", format!("{part} is not JSON: {e}")))
}

// ---------------------------------------------------------------------------
// Algorithms and keys
// ---------------------------------------------------------------------------

/// HMAC signing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HmacAlgorithm {
    /// HMAC-SHA-256.
    #[default]
    Hs256,
    /// HMAC-SHA-384.
    Hs384,
    /// HMAC-SHA-512.
    Hs512,
}

impl HmacAlgorithm {
    /// The JOSE `alg` name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }

    fn digest_name(self) -> &'static str {
        match self {
            Self::Hs256 => "sha256",
            Self::Hs384 => "sha384",
            Self::Hs512 => "sha512",
        }
    }
}

impl FromStr for HmacAlgorithm {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::Hs256),
            "HS384" => Ok(Self::Hs384),
            "HS512" => Ok(Self::Hs512),
            other => Err(ToolError::Unsupported(format!("HMAC algorithm {other:?}"))),
        }
    }
}

impl fmt::Display for HmacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key material for [`verify`].
pub enum VerificationKey {
    /// Shared secret for `HS256`/`HS384`/`HS512`.
    Secret(Zeroizing<Vec<u8>>),
    /// Ed25519 public key for `EdDSA`.
    Ed25519(VerifyingKey),
}

impl VerificationKey {
    /// Shared-secret key.
    pub fn secret(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Secret(Zeroizing::new(bytes.into()))
    }

    /// Ed25519 public key from 64 hex characters.
    ///
    /// # Errors
    ///
    /// [`ToolError::MalformedInput`] for bad hex, wrong length, or a point
    /// that is not a valid public key.
    pub fn ed25519_from_hex(text: &str) -> Result<Self> {
        let bytes = codec::decode(text, Format::Hex)?;
        let array: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            ToolError::malformed("ed25519-key", format!("expected 32 bytes, found {}", bytes.len()))
        })?;
        VerifyingKey::from_bytes(&array)
            .map(Self::Ed25519)
            .map_err(|e| ToolError::malformed("ed25519-key", e.to_string()))
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret(_) => f.write_str("VerificationKey::Secret(<redacted>)"),
            Self::Ed25519(key) => write!(f, "VerificationKey::Ed25519({})", hex::encode(key.as_bytes())),
        }
    }
}

// ---------------------------------------------------------------------------
// Verify and sign
// ---------------------------------------------------------------------------

/// Check the token's signature against `key`.
///
/// Returns `Ok(false)` for a bad signature, `alg: none`, or a key of the
/// wrong kind for the declared algorithm.
///
/// # Errors
///
/// [`ToolError::MalformedInput`] if the token does not decode or has no
/// `alg`. [`ToolError::Unsupported`] for algorithms outside HS256/384/512
/// and EdDSA.
pub fn verify(token: &str, key: &VerificationKey) -> Result<bool> {
    let parts = decode(token)?;
    let alg = parts
        .algorithm()
        .ok_or_else(|| ToolError::malformed("token", "header has no \"alg\""))?;
    let signing_input = parts.signing_input();

    let valid = match (alg, key) {
        ("none", _) => false,
        ("HS256" | "HS384" | "HS512", VerificationKey::Secret(secret)) => {
            let alg: HmacAlgorithm = alg.parse()?;
            let expected = digest::hmac_raw(alg.digest_name(), secret, signing_input.as_bytes())?;
            expected.ct_eq(&parts.signature).into()
        }
        ("EdDSA", VerificationKey::Ed25519(public)) => match Signature::from_slice(&parts.signature) {
            Ok(sig) => public.verify(signing_input.as_bytes(), &sig).is_ok(),
            Err(_) => false,
        },
        ("HS256" | "HS384" | "HS512" | "EdDSA", _) => {
            tracing::debug!(alg, "key kind does not match token algorithm");
            false
        }
        (other, _) => {
            return Err(ToolError::Unsupported(format!("token algorithm {other:?}")));
        }
    };
    tracing::debug!(alg, valid, "verified token signature");
    Ok(valid)
}

/// Mint an HMAC-signed token over `claims`.
pub fn sign_hmac(claims: &Value, alg: HmacAlgorithm, secret: &[u8]) -> Result<String> {
    let header = json!({ "alg": alg.as_str(), "typ": "JWT" });
    let signing_input = signing_input(&header, claims);
    let tag = digest::hmac_raw(alg.digest_name(), secret, signing_input.as_bytes())?;
    Ok(format!("{signing_input}.{}", codec::encode(&tag, Format::Base64Url)))
}

/// Mint an `EdDSA` token over `claims`.
pub fn sign_ed25519(claims: &Value, key: &SigningKey) -> String {
    let header = json!({ "alg": "EdDSA", "typ": "JWT" });
    let signing_input = signing_input(&header, claims);
    let signature = key.sign(signing_input.as_bytes());
    format!(
        "{signing_input}.{}",
        codec::encode(&signature.to_bytes(), Format::Base64Url)
    )
}

/// Ed25519 signing key from its 32-byte seed in hex.
///
/// # Errors
///
/// [`ToolError::MalformedInput`] for bad hex or the wrong length.
pub fn ed25519_signing_key_from_hex(text: &str) -> Result<SigningKey> {
    let seed = Zeroizing::new(codec::decode(text.trim(), Format::Hex)?);
    let array: [u8; 32] = seed.as_slice().try_into().map_err(|_| {
        ToolError::malformed("ed25519-key", format!("expected 32 bytes, found {}", seed.len()))
    })?;
    Ok(SigningKey::from_bytes(&array))
}

fn signing_input(header: &Value, claims: &Value) -> String {
    format!(
        "{}.{}",
        codec::encode(header.to_string().as_bytes(), Format::Base64Url),
        codec::encode(claims.to_string().as_bytes(), Format::Base64Url)
    )
}

// ---------------------------------------------------------------------------
// Registered time claims
// ---------------------------------------------------------------------------

/// Informational view of `iat`, `nbf` and `exp`. Never affects [`verify`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClaimsStatus {
    /// `iat` as ISO 8601.
    pub issued_at: Option<String>,
    /// `nbf` as ISO 8601.
    pub not_before: Option<String>,
    /// `exp` as ISO 8601.
    pub expires_at: Option<String>,
    /// `exp` is at or before `now`.
    pub expired: bool,
    /// `nbf` is after `now`.
    pub not_yet_valid: bool,
}

/// Interpret the numeric time claims of `payload` relative to `now`.
/// Missing, non-numeric or unrepresentable claims are left as `None`.
pub fn claims_status(payload: &Value, now: DateTime<Utc>) -> ClaimsStatus {
    let empty = Map::new();
    let claims = payload.as_object().unwrap_or(&empty);
    let instant = |name: &str| {
        claims
            .get(name)
            .and_then(Value::as_i64)
            .and_then(|secs| Timestamp::from_epoch_secs(secs).ok())
    };
    let now = Timestamp::from_utc(now);
    let iat = instant("iat");
    let nbf = instant("nbf");
    let exp = instant("exp");
    ClaimsStatus {
        issued_at: iat.map(|t| t.to_iso8601()),
        not_before: nbf.map(|t| t.to_iso8601()),
        expires_at: exp.map(|t| t.to_iso8601()),
        expired: exp.is_some_and(|t| t <= now),
        not_yet_valid: nbf.is_some_and(|t| t > now),
    }
}
