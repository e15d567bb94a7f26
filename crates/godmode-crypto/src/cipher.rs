//! # Passphrase Cipher — Argon2id + AES-256-GCM
//!
//! Encrypts a message under a caller-supplied passphrase. A fresh 16-byte
//! salt and 12-byte nonce are drawn from the OS RNG for every call; the key
//! is derived with Argon2id and wiped after use.
//!
//! ## Security Invariant
//!
//! - Decryption fails closed. A wrong passphrase, a flipped ciphertext bit,
//!   a corrupted salt or nonce, and an undecodable field all surface as the
//!   same [`ToolError::Authentication`]; no partial plaintext is returned.
//! - Passphrases, derived keys and plaintext are never logged.
//! - The crate stores nothing: the [`CipherResult`] envelope carries
//!   everything needed to decrypt except the passphrase.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use godmode_core::codec::{self, Format};
use godmode_core::{Result, ToolError};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    fn to_argon2(self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, Some(KEY_LEN))
            .map_err(|e| ToolError::Range(format!("Argon2 parameters rejected: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Output of [`encrypt`]: Base64 ciphertext (with tag), nonce and salt plus
/// the KDF parameters used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherResult {
    /// AES-256-GCM ciphertext followed by the 16-byte tag, Base64.
    pub ciphertext: String,
    /// 12-byte nonce, Base64.
    pub nonce: String,
    /// 16-byte Argon2 salt, Base64.
    pub salt: String,
    /// Parameters the key was derived with.
    #[serde(default)]
    pub kdf: KdfParams,
}

/// Output of [`decrypt`].
#[derive(Clone, PartialEq, Eq)]
pub struct Decrypted {
    /// Recovered message.
    pub plaintext: Vec<u8>,
    /// Always `true`: a value only exists if the tag verified.
    pub authenticity_verified: bool,
}

impl std::fmt::Debug for Decrypted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decrypted")
            .field("plaintext", &format_args!("<{} bytes>", self.plaintext.len()))
            .field("authenticity_verified", &self.authenticity_verified)
            .finish()
    }
}

/// Encrypt with the default KDF parameters.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<CipherResult> {
    encrypt_with(plaintext, passphrase, KdfParams::default())
}

/// Encrypt with explicit KDF parameters.
///
/// # Errors
///
/// [`ToolError::Range`] if `kdf` is rejected by Argon2.
pub fn encrypt_with(plaintext: &[u8], passphrase: &str, kdf: KdfParams) -> Result<CipherResult> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt, kdf)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|_| ToolError::Range("derived key has the wrong length".into()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| ToolError::Range("message too long for AES-GCM".into()))?;

    tracing::debug!(
        plaintext_len = plaintext.len(),
        memory_kib = kdf.memory_kib,
        iterations = kdf.iterations,
        "encrypted message"
    );
    Ok(CipherResult {
        ciphertext: codec::encode(&ciphertext, Format::Base64),
        nonce: codec::encode(&nonce, Format::Base64),
        salt: codec::encode(&salt, Format::Base64),
        kdf,
    })
}

/// Decrypt and authenticate.
///
/// # Errors
///
/// [`ToolError::Authentication`] for any failure involving the envelope
/// contents or the passphrase. [`ToolError::Range`] only when the recorded
/// KDF parameters are themselves invalid.
pub fn decrypt(envelope: &CipherResult, passphrase: &str) -> Result<Decrypted> {
    let argon2 = envelope.kdf.to_argon2()?;
    let ciphertext = field_bytes(&envelope.ciphertext)?;
    let nonce = field_bytes(&envelope.nonce)?;
    let salt = field_bytes(&envelope.salt)?;
    if nonce.len() != NONCE_LEN || salt.len() != SALT_LEN {
        return Err(ToolError::Authentication);
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase.as_bytes(), &salt, key.as_mut_slice())
        .map_err(|_| ToolError::Authentication)?;
    let cipher =
        Aes256Gcm::new_from_slice(key.as_slice()).map_err(|_| ToolError::Authentication)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| ToolError::Authentication)?;

    tracing::debug!(plaintext_len = plaintext.len(), "decrypted message");
    Ok(Decrypted {
        plaintext,
        authenticity_verified: true,
    })
}

fn derive_key(passphrase: &str, salt: &[u8], kdf: KdfParams) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    kdf.to_argon2()?
        .hash_password_into(passphrase.as_bytes(), salt, key.as_mut_slice())
        .map_err(|e| ToolError::Range(format!("key derivation failed: {e}")))?;
    Ok(key)
}

fn field_bytes(text: &str) -> Result<Vec<u8>> {
    codec::decode(text, Format::Base64).map_err(|_| ToolError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Cheap parameters so the suite stays fast.
    const FAST: KdfParams = KdfParams {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };

    fn flip_first_byte(b64: &str) -> String {
        let mut bytes = codec::decode(b64, Format::Base64).unwrap();
        bytes[0] ^= 0x01;
        codec::encode(&bytes, Format::Base64)
    }

    #[test]
    fn round_trip() {
        let sealed = encrypt_with(b"attack at dawn", "hunter2", FAST).unwrap();
        let opened = decrypt(&sealed, "hunter2").unwrap();
        assert_eq!(opened.plaintext, b"attack at dawn");
        assert!(opened.authenticity_verified);
    }

    #[test]
    fn default_params_round_trip() {
        let sealed = encrypt(b"secret", "pw").unwrap();
        assert_eq!(sealed.kdf, KdfParams::default());
        assert_eq!(decrypt(&sealed, "pw").unwrap().plaintext, b"secret");
    }

    #[test]
    fn fresh_salt_and_nonce_each_call() {
        let a = encrypt_with(b"same", "pw", FAST).unwrap();
        let b = encrypt_with(b"same", "pw", FAST).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
        assert_eq!(codec::decode(&a.nonce, Format::Base64).unwrap().len(), NONCE_LEN);
        assert_eq!(codec::decode(&a.salt, Format::Base64).unwrap().len(), SALT_LEN);
    }

    #[test]
    fn wrong_passphrase_is_authentication_error() {
        let sealed = encrypt_with(b"data", "right", FAST).unwrap();
        assert_eq!(decrypt(&sealed, "wrong").unwrap_err(), ToolError::Authentication);
    }

    #[test]
    fn tampering_is_indistinguishable() {
        let sealed = encrypt_with(b"data", "pw", FAST).unwrap();

        let mut bad_ct = sealed.clone();
        bad_ct.ciphertext = flip_first_byte(&sealed.ciphertext);
        let mut bad_nonce = sealed.clone();
        bad_nonce.nonce = flip_first_byte(&sealed.nonce);
        let mut bad_salt = sealed.clone();
        bad_salt.salt = flip_first_byte(&sealed.salt);
        let mut garbage = sealed.clone();
        garbage.ciphertext = "***".into();
        let mut short_nonce = sealed.clone();
        short_nonce.nonce = codec::encode(&[0u8; 4], Format::Base64);

        for envelope in [bad_ct, bad_nonce, bad_salt, garbage, short_nonce] {
            assert_eq!(decrypt(&envelope, "pw").unwrap_err(), ToolError::Authentication);
        }
    }

    #[test]
    fn empty_message_still_authenticated() {
        let sealed = encrypt_with(b"", "pw", FAST).unwrap();
        assert_eq!(codec::decode(&sealed.ciphertext, Format::Base64).unwrap().len(), 16);
        assert!(decrypt(&sealed, "pw").unwrap().plaintext.is_empty());
    }

    #[test]
    fn invalid_kdf_params_rejected() {
        let bad = KdfParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert_eq!(encrypt_with(b"x", "pw", bad).unwrap_err().kind(), "range_error");
    }

    #[test]
    fn envelope_json_round_trip() {
        let sealed = encrypt_with(b"json", "pw", FAST).unwrap();
        let json = serde_json::to_string(&sealed).unwrap();
        let back: CipherResult = serde_json::from_str(&json).unwrap();
        assert_eq!(decrypt(&back, "pw").unwrap().plaintext, b"json");
    }

    #[test]
    fn debug_hides_plaintext() {
        let opened = Decrypted {
            plaintext: b"top secret".to_vec(),
            authenticity_verified: true,
        };
        let rendered = format!("{opened:?}");
        assert!(!rendered.contains("top secret"));
        assert!(rendered.contains("10 bytes"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn decrypt_inverts_encrypt(message in prop::collection::vec(any::<u8>(), 0..256), pass in ".{0,24}") {
            let sealed = encrypt_with(&message, &pass, FAST).unwrap();
            prop_assert_eq!(decrypt(&sealed, &pass).unwrap().plaintext, message);
        }
    }
}
