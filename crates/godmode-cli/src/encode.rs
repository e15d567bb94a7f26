//! # Encode Subcommand
//!
//! Byte-to-text encodings: Base64, Base64url, Base32, Base58, hex, URL and
//! HTML escaping, in either direction.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use godmode_core::codec::{self, Format};

use crate::InputArgs;

/// Arguments for `godmode encode`.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Encoding: base64, base64url, base32, base58, hex, url, html.
    #[arg(long, short = 'F', default_value = "base64")]
    pub format: Format,

    /// Decode instead of encode.
    #[arg(long, short, conflicts_with = "all")]
    pub decode: bool,

    /// Encode into every format.
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs) -> Result<u8> {
    let input = args.input.read_bytes()?;
    if args.decode {
        let text = String::from_utf8(input).context("encoded input is not valid UTF-8")?;
        let bytes = codec::decode(&text, args.format)
            .with_context(|| format!("failed to decode {}", args.format))?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes).context("failed to write output")?;
        if std::str::from_utf8(&bytes).is_ok() && !bytes.ends_with(b"\n") {
            writeln!(stdout).context("failed to write output")?;
        }
        return Ok(0);
    }
    if args.all {
        crate::emit(&render_all(&input));
    } else {
        crate::emit(&codec::encode(&input, args.format));
    }
    Ok(0)
}

/// One `format: value` line per encoding.
pub fn render_all(input: &[u8]) -> String {
    let width = Format::ALL.iter().map(|f| f.as_str().len()).max().unwrap_or(0);
    codec::encode_all(input)
        .into_iter()
        .map(|(format, value)| format!("{:<width$}  {value}\n", format.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_formats_listed() {
        let rendered = render_all(b"Hello");
        assert_eq!(rendered.lines().count(), Format::ALL.len());
        assert!(rendered.contains("base64     SGVsbG8="));
        assert!(rendered.contains("hex        48656c6c6f"));
    }
}
