//! # JSON Subcommand
//!
//! Pretty-prints (default), minifies, or summarizes a JSON document. Parse
//! failures report the line and column of the first error.

use anyhow::Result;
use clap::Args;
use godmode_core::json;

use crate::InputArgs;

/// Arguments for `godmode json`.
#[derive(Args, Debug)]
pub struct JsonArgs {
    /// Emit compact JSON with no insignificant whitespace.
    #[arg(long, short, conflicts_with = "stats")]
    pub minify: bool,

    /// Print depth, key and value counts instead of the document.
    #[arg(long)]
    pub stats: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute the json subcommand.
pub fn run_json(args: &JsonArgs) -> Result<u8> {
    let text = args.input.read_text()?;
    crate::emit(&render(args, &text)?);
    Ok(0)
}

fn render(args: &JsonArgs, text: &str) -> Result<String> {
    if args.minify {
        return Ok(json::minify(text)?);
    }
    if args.stats {
        let stats = json::stats(&json::parse(text)?);
        return Ok(format!(
            "depth   {}\nkeys    {}\nvalues  {}\n",
            stats.depth, stats.keys, stats.values
        ));
    }
    Ok(json::pretty_print(text)?)
}
