//! # Diff Subcommand
//!
//! Line diff of two files. Exit status follows `diff(1)`: 0 when the inputs
//! are identical, 1 when they differ.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use godmode_core::diff::{self, DiffOp};
use serde::Serialize;

/// Arguments for `godmode diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Original file.
    pub left: PathBuf,

    /// Changed file.
    pub right: PathBuf,

    /// Print only the equal/inserted/deleted line counts.
    #[arg(long)]
    pub stats: bool,

    /// Emit the operations and counts as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DiffReport<'a> {
    stats: diff::DiffStats,
    ops: &'a [DiffOp],
}

/// Execute the diff subcommand.
pub fn run_diff(args: &DiffArgs) -> Result<u8> {
    let left = read_utf8(&args.left)?;
    let right = read_utf8(&args.right)?;
    let ops = diff::diff_lines(&left, &right);
    let stats = diff::stats(&ops);
    if args.json {
        crate::emit(&crate::to_json(&DiffReport { stats, ops: &ops })?);
    } else if args.stats {
        crate::emit(&format!(
            "equal     {}\ninserted  {}\ndeleted   {}\n",
            stats.equal, stats.inserted, stats.deleted
        ));
    } else {
        let rendered = diff::render(&ops);
        if !rendered.is_empty() {
            crate::emit(&rendered);
        }
    }
    Ok(u8::from(stats.inserted + stats.deleted > 0))
}

fn read_utf8(path: &std::path::Path) -> Result<String> {
    String::from_utf8(crate::read_file(path)?)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))
}
