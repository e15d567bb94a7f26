//! # godmode-cli — Command-Line Front End for the godmode Toolkit
//!
//! Every tool in `godmode-core` and `godmode-crypto` is reachable as one
//! subcommand of the `godmode` binary:
//!
//! ```bash
//! godmode encode --format base64 "Hello"
//! echo '{"a":1}' | godmode json
//! godmode hash --file release.tar.gz
//! godmode cron "30 4 1,15 * 0" --count 3
//! godmode token decode eyJhbGciOi...
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from behaviour: each module exposes an
//!   `Args` struct and a `run_*` handler returning an exit code.
//! - Handlers delegate to the library crates; no tool logic lives here.
//! - Rendering is done by plain functions returning `String` so tests can
//!   check output without capturing stdout.

pub mod cipher;
pub mod color;
pub mod config;
pub mod cron;
pub mod datauri;
pub mod diff;
pub mod encode;
pub mod hash;
pub mod json;
pub mod radix;
pub mod regex;
pub mod time;
pub mod token;
pub mod uuid;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

/// Single-input source shared by most subcommands: inline text, a file,
/// or stdin when neither is given (or the text is `-`).
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Input text. Reads stdin when omitted or `-`.
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Read input from a file instead.
    #[arg(long, short, value_name = "FILE", conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    /// Inline text input.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file: None,
        }
    }

    /// Read the input as raw bytes.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match (&self.text, &self.file) {
            (_, Some(path)) => read_file(path),
            (Some(text), None) if text != "-" => Ok(text.clone().into_bytes()),
            _ => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .context("failed to read stdin")?;
                Ok(buf)
            }
        }
    }

    /// Read the input as UTF-8 text.
    pub fn read_text(&self) -> Result<String> {
        String::from_utf8(self.read_bytes()?).context("input is not valid UTF-8")
    }
}

/// Read a whole file with path context on failure.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Pretty JSON for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}

/// Print rendered output, adding a trailing newline if missing.
pub fn emit(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
}
