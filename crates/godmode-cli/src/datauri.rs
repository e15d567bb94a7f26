//! # Data URI Subcommand
//!
//! Wraps a file (or stdin) as a `data:` URI, or with `--decode` unpacks a
//! URI into raw bytes.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use godmode_core::datauri;

use crate::InputArgs;

/// Arguments for `godmode datauri`.
#[derive(Args, Debug)]
pub struct DataUriArgs {
    /// Media type to declare. Sniffed from the content when omitted.
    #[arg(long, conflicts_with = "decode")]
    pub mime: Option<String>,

    /// Treat the input as a data URI and write its payload.
    #[arg(long, short)]
    pub decode: bool,

    /// Write decoded bytes here instead of stdout.
    #[arg(long, short, value_name = "FILE", requires = "decode")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute the datauri subcommand.
pub fn run_datauri(args: &DataUriArgs) -> Result<u8> {
    if !args.decode {
        let bytes = args.input.read_bytes()?;
        crate::emit(&datauri::encode(&bytes, args.mime.as_deref()));
        return Ok(0);
    }
    let uri = datauri::decode(&args.input.read_text()?)?;
    tracing::info!(mime = %uri.mime, bytes = uri.bytes.len(), "decoded data URI");
    match &args.output {
        Some(path) => std::fs::write(path, &uri.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&uri.bytes).context("failed to write output")?;
            stdout.flush().context("failed to write output")?;
        }
    }
    Ok(0)
}
