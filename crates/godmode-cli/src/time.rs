//! # Time Subcommand
//!
//! Shows one instant as Unix seconds, Unix milliseconds, ISO 8601 and
//! RFC 2822. The value may be an integer epoch (unit from `--unit`) or an
//! ISO 8601 string; with no value the current time is used.

use anyhow::Result;
use clap::Args;
use godmode_core::temporal::{self, TimestampReport};
use godmode_core::{EpochUnit, Timestamp};

/// Arguments for `godmode time`.
#[derive(Args, Debug)]
pub struct TimeArgs {
    /// Epoch integer or ISO 8601 timestamp. Defaults to now.
    #[arg(allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Unit of a numeric value: `s` or `ms`.
    #[arg(long, short, default_value = "s")]
    pub unit: EpochUnit,

    /// Emit JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the time subcommand.
pub fn run_time(args: &TimeArgs) -> Result<u8> {
    let report = TimestampReport::from(resolve(args.value.as_deref(), args.unit)?);
    crate::emit(&if args.json {
        crate::to_json(&report)?
    } else {
        render(&report)
    });
    Ok(0)
}

fn resolve(value: Option<&str>, unit: EpochUnit) -> Result<Timestamp> {
    let Some(value) = value.map(str::trim) else {
        return Ok(Timestamp::now());
    };
    let numeric = value
        .strip_prefix('-')
        .unwrap_or(value)
        .chars()
        .all(|c| c.is_ascii_digit());
    if numeric && !value.is_empty() {
        Ok(temporal::parse_epoch(value, unit)?)
    } else {
        Ok(Timestamp::parse(value)?)
    }
}

fn render(report: &TimestampReport) -> String {
    format!(
        "unix     {}\nmillis   {}\niso8601  {}\nrfc2822  {}\n",
        report.unix_seconds, report.unix_millis, report.iso8601, report.rfc2822
    )
}
