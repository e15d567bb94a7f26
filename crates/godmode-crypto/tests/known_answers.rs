//! # Known-Answer Tests
//!
//! Published test vectors run through the public API: digests of `"abc"`
//! (FIPS 180 examples), the RFC 4231 HMAC case, the jwt.io sample token,
//! and end-to-end cipher and identifier checks.

use godmode_crypto::cipher::{self, KdfParams};
use godmode_crypto::{digest, identifier, token, DigestRegistry, VerificationKey};
use godmode_core::ToolError;

#[test]
fn fips_180_abc_digests() {
    let result = digest::digest_all(b"abc");
    assert_eq!(result.get("sha1"), Some("a9993e364706816aba3e25717850c26c9cd0d89d"));
    assert_eq!(
        result.get("sha256"),
        Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
    );
    assert_eq!(result.get("md5"), Some("900150983cd24fb0d6963f7d28e17f72"));
    assert_eq!(result.get("crc32"), Some("352441c2"));
}

#[test]
fn default_registry_names() {
    assert_eq!(
        DigestRegistry::default().names(),
        vec!["md5", "sha1", "sha224", "sha256", "sha384", "sha512", "crc32"]
    );
}

#[test]
fn rfc_4231_hmac_sha512() {
    let result = digest::hmac_all(b"Jefe", b"what do ya want for nothing?").unwrap();
    assert_eq!(
        result.get("sha512"),
        Some(
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        )
    );
}

#[test]
fn cipher_end_to_end() {
    let kdf = KdfParams {
        memory_kib: 128,
        iterations: 1,
        parallelism: 1,
    };
    let sealed = cipher::encrypt_with("héllo wörld".as_bytes(), "correct horse", kdf).unwrap();
    let opened = cipher::decrypt(&sealed, "correct horse").unwrap();
    assert_eq!(String::from_utf8(opened.plaintext).unwrap(), "héllo wörld");
    assert_eq!(
        cipher::decrypt(&sealed, "battery staple").unwrap_err(),
        ToolError::Authentication
    );
}

#[test]
fn jwt_io_sample_decodes_and_verifies() {
    let sample = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                  eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
                  SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";
    let parts = token::decode(sample).unwrap();
    assert_eq!(parts.payload["sub"], "1234567890");
    assert!(!parts.verified);
    let key = VerificationKey::secret(b"your-256-bit-secret".to_vec());
    assert!(token::verify(sample, &key).unwrap());
}

#[test]
fn uuid_v4_shape() {
    let id = identifier::new_v4();
    assert_eq!(id.len(), 36);
    assert_eq!(&id[14..15], "4");
    assert_eq!(id.matches('-').count(), 4);
}
