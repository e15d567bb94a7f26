//! # Hash Subcommand
//!
//! Runs every digest in the configured registry over one input, or every
//! HMAC when a key is given.

use anyhow::Result;
use clap::Args;
use godmode_crypto::{DigestRegistry, HashResult};

use crate::config::Config;
use crate::InputArgs;

/// Arguments for `godmode hash`.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Only these algorithms (repeatable). Overrides `hash.algorithms`.
    #[arg(long = "algorithm", short = 'a', value_name = "NAME")]
    pub algorithms: Vec<String>,

    /// Compute HMACs under this key instead of plain digests.
    #[arg(long, value_name = "KEY")]
    pub hmac_key: Option<String>,

    /// Emit JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute the hash subcommand.
pub fn run_hash(args: &HashArgs, config: &Config) -> Result<u8> {
    let registry = registry_for(args, config)?;
    let input = args.input.read_bytes()?;
    let result = match &args.hmac_key {
        Some(key) => registry.hmac_all(key.as_bytes(), &input)?,
        None => registry.digest_all(&input),
    };
    crate::emit(&if args.json {
        crate::to_json(&result)?
    } else {
        render(&result)
    });
    Ok(0)
}

fn registry_for(args: &HashArgs, config: &Config) -> Result<DigestRegistry> {
    let registry = config.digest_registry()?;
    if args.algorithms.is_empty() {
        Ok(registry)
    } else {
        Ok(DigestRegistry::default().restrict(&args.algorithms)?)
    }
}

/// Aligned `name  hex` lines.
pub fn render(result: &HashResult) -> String {
    let width = result.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    result
        .iter()
        .map(|(name, hex)| format!("{name:<width$}  {hex}\n"))
        .collect()
}
