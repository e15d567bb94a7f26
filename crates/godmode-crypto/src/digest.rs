//! # Digest Registry — Multi-Algorithm Hash Dispatch
//!
//! A [`DigestRegistry`] maps algorithm names to digest functions and
//! computes every registered digest of one input in a single call. The
//! default registry carries MD5, SHA-1, SHA-224, SHA-256, SHA-384, SHA-512
//! and CRC32; the SHA family also supports keyed HMAC.
//!
//! ## Invariants
//!
//! - Output is lowercase hex. CRC32 renders as 8 hex digits, big-endian.
//! - Dispatch is keyed by name, so restricting or reordering the registry
//!   never changes the digest reported under a given name.
//! - MD5 and SHA-1 are present for checksum display only.

use std::collections::BTreeMap;

use godmode_core::{Result, ToolError};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

type DigestFn = fn(&[u8]) -> Vec<u8>;
type HmacFn = fn(&[u8], &[u8]) -> Result<Vec<u8>>;

/// One registered algorithm.
#[derive(Clone, Copy)]
pub struct DigestEntry {
    name: &'static str,
    digest: DigestFn,
    hmac: Option<HmacFn>,
}

impl DigestEntry {
    /// Registry name, e.g. `sha256`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Digest `input`, returning raw bytes.
    pub fn digest(&self, input: &[u8]) -> Vec<u8> {
        (self.digest)(input)
    }

    /// Whether the algorithm has a keyed HMAC form.
    pub fn supports_hmac(&self) -> bool {
        self.hmac.is_some()
    }

    /// HMAC of `input` under `key`, returning raw bytes.
    ///
    /// # Errors
    ///
    /// [`ToolError::Unsupported`] for algorithms with no HMAC form.
    pub fn hmac(&self, key: &[u8], input: &[u8]) -> Result<Vec<u8>> {
        match self.hmac {
            Some(mac) => mac(key, input),
            None => Err(ToolError::Unsupported(format!("HMAC-{}", self.name))),
        }
    }
}

impl std::fmt::Debug for DigestEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestEntry")
            .field("name", &self.name)
            .field("hmac", &self.hmac.is_some())
            .finish()
    }
}

/// Named hex digests of one input, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct HashResult {
    digests: BTreeMap<&'static str, String>,
}

impl HashResult {
    /// Hex digest for `name`, if computed.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.digests.get(name).map(String::as_str)
    }

    /// Number of digests.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// Whether no digest was computed.
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// `(name, hex)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.digests.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Ordered set of digest algorithms.
#[derive(Debug, Clone)]
pub struct DigestRegistry {
    entries: Vec<DigestEntry>,
}

impl Default for DigestRegistry {
    fn default() -> Self {
        Self {
            entries: vec![
                DigestEntry { name: "md5", digest: hash::<Md5>, hmac: None },
                DigestEntry { name: "sha1", digest: hash::<Sha1>, hmac: Some(mac::<Hmac<Sha1>>) },
                DigestEntry { name: "sha224", digest: hash::<Sha224>, hmac: Some(mac::<Hmac<Sha224>>) },
                DigestEntry { name: "sha256", digest: hash::<Sha256>, hmac: Some(mac::<Hmac<Sha256>>) },
                DigestEntry { name: "sha384", digest: hash::<Sha384>, hmac: Some(mac::<Hmac<Sha384>>) },
                DigestEntry { name: "sha512", digest: hash::<Sha512>, hmac: Some(mac::<Hmac<Sha512>>) },
                DigestEntry { name: "crc32", digest: crc32, hmac: None },
            ],
        }
    }
}

impl DigestRegistry {
    /// Registered names in registry order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(DigestEntry::name).collect()
    }

    /// Look up an entry by name (case-insensitive, `-` ignored, so
    /// `SHA-256` finds `sha256`).
    pub fn get(&self, name: &str) -> Option<&DigestEntry> {
        let wanted = name.trim().to_ascii_lowercase().replace('-', "");
        self.entries.iter().find(|e| e.name == wanted)
    }

    /// A registry holding only `names`, in the given order.
    ///
    /// # Errors
    ///
    /// [`ToolError::Unsupported`] naming the first unknown algorithm.
    pub fn restrict<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let entries = names
            .iter()
            .map(|n| {
                self.get(n.as_ref()).copied().ok_or_else(|| {
                    ToolError::Unsupported(format!("unknown digest algorithm {:?}", n.as_ref()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Hex digest of `input` under one algorithm.
    pub fn digest(&self, name: &str, input: &[u8]) -> Result<String> {
        let entry = self
            .get(name)
            .ok_or_else(|| ToolError::Unsupported(format!("unknown digest algorithm {name:?}")))?;
        Ok(hex::encode(entry.digest(input)))
    }

    /// Every registered digest of `input`.
    pub fn digest_all(&self, input: &[u8]) -> HashResult {
        tracing::debug!(algorithms = self.entries.len(), input_len = input.len(), "digesting input");
        let digests = self
            .entries
            .iter()
            .map(|e| (e.name, hex::encode(e.digest(input))))
            .collect();
        HashResult { digests }
    }

    /// HMAC of `input` under `key` for every registered algorithm that
    /// has one. The key is never logged.
    pub fn hmac_all(&self, key: &[u8], input: &[u8]) -> Result<HashResult> {
        let mut digests = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.supports_hmac()) {
            digests.insert(entry.name, hex::encode(entry.hmac(key, input)?));
        }
        tracing::debug!(algorithms = digests.len(), input_len = input.len(), "computed HMACs");
        Ok(HashResult { digests })
    }
}

/// Every digest in the default registry.
pub fn digest_all(input: &[u8]) -> HashResult {
    DigestRegistry::default().digest_all(input)
}

/// Every HMAC in the default registry.
pub fn hmac_all(key: &[u8], input: &[u8]) -> Result<HashResult> {
    DigestRegistry::default().hmac_all(key, input)
}

/// Raw HMAC under a named algorithm from the default registry.
pub(crate) fn hmac_raw(name: &str, key: &[u8], input: &[u8]) -> Result<Vec<u8>> {
    let registry = DigestRegistry::default();
    let entry = registry
        .get(name)
        .ok_or_else(|| ToolError::Unsupported(format!("unknown digest algorithm {name:?}")))?;
    entry.hmac(key, input)
}

fn hash<D: Digest>(input: &[u8]) -> Vec<u8> {
    D::digest(input).to_vec()
}

fn mac<M: Mac + KeyInit>(key: &[u8], input: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|_| ToolError::Range("HMAC key length rejected".into()))?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn crc32(input: &[u8]) -> Vec<u8> {
    crc32fast::hash(input).to_be_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_reference_digests() {
        let result = digest_all(b"hello");
        assert_eq!(result.get("md5"), Some("5d41402abc4b2a76b9719d911017c592"));
        assert_eq!(result.get("sha1"), Some("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"));
        assert_eq!(
            result.get("sha256"),
            Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        );
        assert_eq!(result.get("crc32"), Some("3610a686"));
    }

    #[test]
    fn at_least_five_named_digests() {
        let result = digest_all(b"test");
        assert!(result.len() >= 5);
        assert!(result.iter().all(|(_, hex)| !hex.is_empty()));
    }

    #[test]
    fn empty_input_digests() {
        let result = digest_all(b"");
        assert_eq!(result.get("md5"), Some("d41d8cd98f00b204e9800998ecf8427e"));
        assert_eq!(
            result.get("sha224"),
            Some("d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f")
        );
        assert_eq!(
            result.get("sha512"),
            Some(
                "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
                 47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
            )
        );
        assert_eq!(result.get("crc32"), Some("00000000"));
    }

    #[test]
    fn lookup_is_lenient_about_spelling() {
        let registry = DigestRegistry::default();
        assert_eq!(registry.get("SHA-256").map(DigestEntry::name), Some("sha256"));
        assert!(registry.get("whirlpool").is_none());
        assert_eq!(
            registry.digest("Sha1", b"hello").unwrap(),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
    }

    #[test]
    fn restrict_keeps_requested_only() {
        let registry = DigestRegistry::default().restrict(&["sha256", "md5"]).unwrap();
        assert_eq!(registry.names(), vec!["sha256", "md5"]);
        let result = registry.digest_all(b"x");
        assert_eq!(result.len(), 2);
        assert_eq!(
            DigestRegistry::default().restrict(&["sha3"]).unwrap_err().kind(),
            "unsupported"
        );
    }

    #[test]
    fn hmac_rfc4231_case_two() {
        let result = hmac_all(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            result.get("sha256"),
            Some("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
        );
        assert_eq!(result.get("sha1"), Some("effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"));
        assert!(result.get("md5").is_none());
        assert!(result.get("crc32").is_none());
    }

    #[test]
    fn hmac_on_checksum_is_unsupported() {
        let registry = DigestRegistry::default();
        let crc = registry.get("crc32").unwrap();
        assert!(!crc.supports_hmac());
        assert_eq!(crc.hmac(b"k", b"x").unwrap_err().kind(), "unsupported");
    }

    #[test]
    fn serializes_as_flat_map() {
        let registry = DigestRegistry::default().restrict(&["crc32"]).unwrap();
        let json = serde_json::to_string(&registry.digest_all(b"hello")).unwrap();
        assert_eq!(json, r#"{"crc32":"3610a686"}"#);
    }
}
