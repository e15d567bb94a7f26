//! # Cipher Subcommand
//!
//! Passphrase encryption with Argon2id and AES-256-GCM. `encrypt` prints
//! the envelope (ciphertext, nonce, salt, KDF parameters) as JSON;
//! `decrypt` reads that JSON back and writes the plaintext.
//!
//! ## Security Invariant
//!
//! Passphrases never appear in logs. Any decryption failure is reported as
//! a single authentication error with no detail about which part failed.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use godmode_crypto::{cipher, CipherResult, KdfParams};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::InputArgs;

/// Arguments for the `godmode cipher` subcommand.
#[derive(Args, Debug)]
pub struct CipherArgs {
    #[command(subcommand)]
    pub command: CipherCommand,
}

/// Where the passphrase comes from.
#[derive(Args, Clone)]
#[group(required = true, multiple = false)]
pub struct PassphraseArgs {
    /// Passphrase given inline.
    #[arg(long)]
    pub passphrase: Option<String>,

    /// Read the passphrase from the first line of a file.
    #[arg(long, value_name = "FILE")]
    pub passphrase_file: Option<PathBuf>,
}

impl std::fmt::Debug for PassphraseArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassphraseArgs")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("passphrase_file", &self.passphrase_file)
            .finish()
    }
}

impl PassphraseArgs {
    /// Resolve the passphrase. A file's trailing newline is not part of it.
    pub fn resolve(&self) -> Result<Zeroizing<String>> {
        let passphrase = match (&self.passphrase, &self.passphrase_file) {
            (Some(inline), _) => Zeroizing::new(inline.clone()),
            (None, Some(path)) => {
                let raw = Zeroizing::new(crate::read_file(path)?);
                let text = std::str::from_utf8(&raw).context("passphrase file is not valid UTF-8")?;
                Zeroizing::new(text.lines().next().unwrap_or_default().to_string())
            }
            (None, None) => anyhow::bail!("either --passphrase or --passphrase-file is required"),
        };
        anyhow::ensure!(!passphrase.is_empty(), "passphrase must not be empty");
        Ok(passphrase)
    }
}

/// Cipher subcommands.
#[derive(Subcommand, Debug)]
pub enum CipherCommand {
    /// Encrypt the input and print the JSON envelope.
    Encrypt {
        #[command(flatten)]
        passphrase: PassphraseArgs,
        #[command(flatten)]
        input: InputArgs,
    },

    /// Decrypt a JSON envelope and write the plaintext.
    Decrypt {
        #[command(flatten)]
        passphrase: PassphraseArgs,
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Execute the cipher subcommand.
pub fn run_cipher(args: &CipherArgs, config: &Config) -> Result<u8> {
    match &args.command {
        CipherCommand::Encrypt { passphrase, input } => {
            let envelope = seal(&input.read_bytes()?, &passphrase.resolve()?, config.cipher.kdf)?;
            crate::emit(&crate::to_json(&envelope)?);
            Ok(0)
        }
        CipherCommand::Decrypt { passphrase, input } => {
            let plaintext = open(&input.read_text()?, &passphrase.resolve()?)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&plaintext).context("failed to write output")?;
            stdout.flush().context("failed to write output")?;
            Ok(0)
        }
    }
}

fn seal(plaintext: &[u8], passphrase: &str, kdf: KdfParams) -> Result<CipherResult> {
    tracing::info!(
        bytes = plaintext.len(),
        memory_kib = kdf.memory_kib,
        iterations = kdf.iterations,
        "encrypting"
    );
    Ok(cipher::encrypt_with(plaintext, passphrase, kdf)?)
}

fn open(envelope_json: &str, passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    let envelope: CipherResult =
        serde_json::from_str(envelope_json).context("input is not a cipher envelope")?;
    let decrypted = cipher::decrypt(&envelope, passphrase)?;
    Ok(Zeroizing::new(decrypted.plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn envelope_json_round_trip() {
        let envelope = seal(b"attack at dawn", "pw", FAST).unwrap();
        let json = crate::to_json(&envelope).unwrap();
        assert_eq!(open(&json, "pw").unwrap().as_slice(), b"attack at dawn");
    }

    #[test]
    fn wrong_passphrase_is_authentication_error() {
        let json = crate::to_json(&seal(b"x", "pw", FAST).unwrap()).unwrap();
        let err = open(&json, "nope").unwrap_err();
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn passphrase_file_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass.txt");
        std::fs::write(&path, "s3cret\nignored\n").unwrap();
        let args = PassphraseArgs {
            passphrase: None,
            passphrase_file: Some(path),
        };
        assert_eq!(args.resolve().unwrap().as_str(), "s3cret");
    }

    #[test]
    fn debug_hides_passphrase() {
        let args = PassphraseArgs {
            passphrase: Some("hunter2".into()),
            passphrase_file: None,
        };
        assert!(!format!("{args:?}").contains("hunter2"));
    }
}
