//! # godmode-crypto — Hashing, Encryption, Tokens, Identifiers
//!
//! The tools that need cryptographic primitives or randomness:
//!
//! - **Digest registry**: MD5, SHA-1, SHA-2 and CRC32 over one input, plus
//!   keyed HMAC for the SHA family.
//! - **Passphrase cipher**: Argon2id key derivation and AES-256-GCM
//!   authenticated encryption with a fresh salt and nonce per message.
//! - **Token decoder**: splits and decodes compact JWT-style tokens, and
//!   verifies HS256/384/512 and EdDSA signatures as a separate step.
//! - **Identifiers**: RFC 4122 version 4 UUIDs.
//!
//! ## Crate Policy
//!
//! - Depends only on `godmode-core` internally and shares its
//!   [`ToolError`](godmode_core::ToolError) taxonomy.
//! - No mocking of cryptographic operations in tests; all tests use the
//!   real primitives.
//! - Secrets (passphrases, keys, derived key material, plaintext) are never
//!   logged and are redacted from `Debug` output.

pub mod cipher;
pub mod digest;
pub mod identifier;
pub mod token;

pub use cipher::{CipherResult, Decrypted, KdfParams};
pub use digest::{DigestRegistry, HashResult};
pub use token::{HmacAlgorithm, Token3Part, VerificationKey};
