//! # Cron Subcommand
//!
//! Parses a five-field expression, describes it in English and lists the
//! next runs. The search horizon and default run count come from the
//! `cron` section of the configuration file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use godmode_core::{cron, Timestamp};
use serde::Serialize;

use crate::config::Config;

/// Arguments for `godmode cron`.
#[derive(Args, Debug)]
pub struct CronArgs {
    /// Expression such as `*/15 9-17 * * MON-FRI` or `@daily`.
    pub expression: String,

    /// Search from this ISO 8601 instant instead of now.
    #[arg(long, value_name = "TIMESTAMP")]
    pub from: Option<String>,

    /// Number of upcoming runs. Defaults to `cron.preview`.
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Emit JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CronReport {
    expression: String,
    description: String,
    upcoming: Vec<String>,
}

/// Execute the cron subcommand.
pub fn run_cron(args: &CronArgs, config: &Config) -> Result<u8> {
    let from = match &args.from {
        Some(text) => *Timestamp::parse(text)
            .context("--from must be an ISO 8601 timestamp")?
            .as_datetime(),
        None => Utc::now(),
    };
    let count = args.count.unwrap_or(config.cron.preview);
    let report = build_report(&args.expression, from, count, config)?;
    crate::emit(&if args.json {
        crate::to_json(&report)?
    } else {
        render(&report)
    });
    Ok(0)
}

fn build_report(expression: &str, from: DateTime<Utc>, count: usize, config: &Config) -> Result<CronReport> {
    let schedule = cron::parse(expression)?;
    let upcoming = if count == 0 {
        Vec::new()
    } else {
        schedule.upcoming(from, count, config.cron_horizon()?)?
    };
    Ok(CronReport {
        expression: schedule.expression().to_string(),
        description: schedule.describe(),
        upcoming: upcoming
            .into_iter()
            .map(|t| Timestamp::from_utc(t).to_iso8601())
            .collect(),
    })
}

fn render(report: &CronReport) -> String {
    let mut out = format!("{}\n", report.description);
    for run in &report.upcoming {
        out.push_str(&format!("  {run}\n"));
    }
    out
}
