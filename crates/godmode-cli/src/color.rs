//! # Color Subcommand

use anyhow::Result;
use clap::Args;
use godmode_core::color;

/// Arguments for `godmode color`.
#[derive(Args, Debug)]
pub struct ColorArgs {
    /// `#rrggbb`, `#rgb` or `rgb(r, g, b)`.
    pub value: String,

    /// Emit JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the color subcommand.
pub fn run_color(args: &ColorArgs) -> Result<u8> {
    let report = color::convert(&args.value)?;
    crate::emit(&if args.json {
        crate::to_json(&report)?
    } else {
        format!("hex  {}\nrgb  {}\nhsl  {}\n", report.hex, report.rgb, report.hsl)
    });
    Ok(0)
}
