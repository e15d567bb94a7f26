//! # Radix Subcommand
//!
//! Converts an integer between bases 2 through 36. Without `--to`, prints
//! the binary, octal, decimal and hex renditions.

use anyhow::Result;
use clap::Args;
use godmode_core::radix;

/// Arguments for `godmode radix`.
#[derive(Args, Debug)]
pub struct RadixArgs {
    /// The number to convert. A leading `-` must follow `--`.
    #[arg(allow_hyphen_values = true)]
    pub number: String,

    /// Base the number is written in.
    #[arg(long, default_value_t = 10)]
    pub from: u32,

    /// Target base. Omit to show bases 2, 8, 10 and 16.
    #[arg(long)]
    pub to: Option<u32>,

    /// Emit JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the radix subcommand.
pub fn run_radix(args: &RadixArgs) -> Result<u8> {
    crate::emit(&render(args)?);
    Ok(0)
}

fn render(args: &RadixArgs) -> Result<String> {
    if let Some(to) = args.to {
        return Ok(radix::convert(&args.number, args.from, to)?);
    }
    let all = radix::all_bases(&args.number, args.from)?;
    if args.json {
        return crate::to_json(&all);
    }
    Ok(format!(
        "bin  {}\noct  {}\ndec  {}\nhex  {}\n",
        all.binary, all.octal, all.decimal, all.hex
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(number: &str, from: u32, to: Option<u32>) -> RadixArgs {
        RadixArgs {
            number: number.into(),
            from,
            to,
            json: false,
        }
    }

    #[test]
    fn single_target() {
        assert_eq!(render(&args("255", 10, Some(16))).unwrap(), "ff");
    }

    #[test]
    fn all_bases_table() {
        assert_eq!(
            render(&args("ff", 16, None)).unwrap(),
            "bin  11111111\noct  377\ndec  255\nhex  ff\n"
        );
    }

    #[test]
    fn bad_digit_is_error() {
        assert!(render(&args("19", 8, Some(10))).is_err());
    }
}
