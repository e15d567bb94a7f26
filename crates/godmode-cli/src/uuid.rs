//! # UUID Subcommand

use anyhow::Result;
use clap::Args;
use godmode_crypto::identifier;

/// Arguments for `godmode uuid`.
#[derive(Args, Debug)]
pub struct UuidArgs {
    /// How many identifiers to generate.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,

    /// Uppercase hex digits.
    #[arg(long, short)]
    pub upper: bool,
}

/// Execute the uuid subcommand.
pub fn run_uuid(args: &UuidArgs) -> Result<u8> {
    let ids = identifier::new_v4_batch(args.count, args.upper)?;
    crate::emit(&ids.join("\n"));
    Ok(0)
}
