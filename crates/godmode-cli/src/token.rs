//! # Token Subcommand
//!
//! Decode, verify and mint compact JWT-style tokens.
//!
//! ## Security Invariant
//!
//! `decode` never verifies and says so in its output. Only `verify` can
//! report a token as authentic, and it exits 1 for anything else.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgGroup, Args, Subcommand};
use godmode_crypto::token::{self, ClaimsStatus};
use godmode_crypto::{HmacAlgorithm, Token3Part, VerificationKey};
use serde::Serialize;

/// Arguments for the `godmode token` subcommand.
#[derive(Args, Debug)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands.
#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Show the header, payload and time claims without verifying.
    Decode {
        /// The compact token.
        token: String,
        /// Emit JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check the signature with a shared secret or Ed25519 public key.
    #[command(group(ArgGroup::new("key").required(true).args(["secret", "ed25519_key"])))]
    Verify {
        /// The compact token.
        token: String,
        /// HMAC secret for HS256/HS384/HS512.
        #[arg(long)]
        secret: Option<String>,
        /// Ed25519 public key, 64 hex characters.
        #[arg(long, value_name = "HEX")]
        ed25519_key: Option<String>,
    },

    /// Mint a token over a JSON claims object.
    #[command(group(ArgGroup::new("key").required(true).args(["secret", "ed25519_key"])))]
    Sign {
        /// Claims as a JSON object.
        #[arg(long)]
        claims: String,
        /// HMAC algorithm used with `--secret`.
        #[arg(long, default_value = "HS256")]
        alg: HmacAlgorithm,
        /// HMAC secret.
        #[arg(long)]
        secret: Option<String>,
        /// Ed25519 private key seed, 64 hex characters. Produces an EdDSA token.
        #[arg(long, value_name = "HEX")]
        ed25519_key: Option<String>,
    },
}

#[derive(Serialize)]
struct DecodedReport<'a> {
    header: &'a serde_json::Value,
    payload: &'a serde_json::Value,
    signature: String,
    claims: ClaimsStatus,
    verified: bool,
}

/// Execute the token subcommand.
pub fn run_token(args: &TokenArgs) -> Result<u8> {
    match &args.command {
        TokenCommand::Decode { token, json } => cmd_decode(token, *json),
        TokenCommand::Verify {
            token,
            secret,
            ed25519_key,
        } => cmd_verify(token, secret.as_deref(), ed25519_key.as_deref()),
        TokenCommand::Sign {
            claims,
            alg,
            secret,
            ed25519_key,
        } => cmd_sign(claims, *alg, secret.as_deref(), ed25519_key.as_deref()),
    }
}

fn cmd_decode(raw: &str, json: bool) -> Result<u8> {
    let parts = token::decode(raw)?;
    crate::emit(&if json {
        let report = DecodedReport {
            header: &parts.header,
            payload: &parts.payload,
            signature: godmode_core::codec::encode(&parts.signature, godmode_core::Format::Hex),
            claims: token::claims_status(&parts.payload, Utc::now()),
            verified: parts.verified,
        };
        crate::to_json(&report)?
    } else {
        render_decoded(&parts, &token::claims_status(&parts.payload, Utc::now()))
    });
    Ok(0)
}

/// Human-readable decode output. Always states that nothing was verified.
pub fn render_decoded(parts: &Token3Part, claims: &ClaimsStatus) -> String {
    let mut out = String::new();
    out.push_str("header:\n");
    out.push_str(&godmode_core::json::to_pretty(&parts.header));
    out.push_str("payload:\n");
    out.push_str(&godmode_core::json::to_pretty(&parts.payload));
    for (label, value) in [
        ("issued at", &claims.issued_at),
        ("not before", &claims.not_before),
        ("expires at", &claims.expires_at),
    ] {
        if let Some(value) = value {
            out.push_str(&format!("{label}: {value}\n"));
        }
    }
    if claims.expired {
        out.push_str("note: token is expired\n");
    }
    if claims.not_yet_valid {
        out.push_str("note: token is not yet valid\n");
    }
    out.push_str("signature not verified\n");
    out
}

fn cmd_verify(raw: &str, secret: Option<&str>, ed25519_key: Option<&str>) -> Result<u8> {
    let key = match (secret, ed25519_key) {
        (Some(secret), _) => VerificationKey::secret(secret.as_bytes().to_vec()),
        (None, Some(hex)) => VerificationKey::ed25519_from_hex(hex)?,
        (None, None) => anyhow::bail!("either --secret or --ed25519-key is required"),
    };
    if token::verify(raw, &key)? {
        println!("OK: signature is valid");
        Ok(0)
    } else {
        println!("FAIL: signature verification failed");
        Ok(1)
    }
}

fn cmd_sign(claims: &str, alg: HmacAlgorithm, secret: Option<&str>, ed25519_key: Option<&str>) -> Result<u8> {
    let claims: serde_json::Value =
        serde_json::from_str(claims).context("--claims must be valid JSON")?;
    anyhow::ensure!(claims.is_object(), "--claims must be a JSON object");
    let minted = match (secret, ed25519_key) {
        (Some(secret), _) => token::sign_hmac(&claims, alg, secret.as_bytes())?,
        (None, Some(hex)) => {
            let key = token::ed25519_signing_key_from_hex(hex)?;
            token::sign_ed25519(&claims, &key)
        }
        (None, None) => anyhow::bail!("either --secret or --ed25519-key is required"),
    };
    crate::emit(&minted);
    Ok(0)
}
