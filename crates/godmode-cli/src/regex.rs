//! # Regex Subcommand
//!
//! Lists every match of a pattern (offsets are byte positions) or, with
//! `--replace`, prints the text with every match substituted.

use anyhow::Result;
use clap::Args;
use godmode_core::{MatchRecord, Pattern};

use crate::InputArgs;

/// Arguments for `godmode regex`.
#[derive(Args, Debug)]
pub struct RegexArgs {
    /// The pattern to search for.
    pub pattern: String,

    /// Flag letters: g, i, m, s, x, U.
    #[arg(long, default_value = "g")]
    pub flags: String,

    /// Replace every match; `$1` and `${name}` expand capture groups.
    #[arg(long, short, value_name = "REPLACEMENT")]
    pub replace: Option<String>,

    /// Emit matches as JSON.
    #[arg(long, conflicts_with = "replace")]
    pub json: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute the regex subcommand. Exits 1 when nothing matches.
pub fn run_regex(args: &RegexArgs) -> Result<u8> {
    let pattern = Pattern::new(&args.pattern, &args.flags)?;
    let text = args.input.read_text()?;
    if let Some(replacement) = &args.replace {
        crate::emit(&pattern.replace_all(&text, replacement));
        return Ok(0);
    }
    let matches: Vec<MatchRecord> = pattern.matches(&text).collect();
    tracing::debug!(count = matches.len(), "pattern search finished");
    if args.json {
        crate::emit(&crate::to_json(&matches)?);
    } else if !matches.is_empty() {
        crate::emit(&render(&matches));
    }
    Ok(u8::from(matches.is_empty()))
}

/// `start..end  text` per match, capture groups indented below.
pub fn render(matches: &[MatchRecord]) -> String {
    let mut out = String::new();
    for m in matches {
        out.push_str(&format!("{}..{}  {}\n", m.start, m.end, m.text));
        for (i, group) in m.groups.iter().enumerate() {
            match group {
                Some(g) => out.push_str(&format!("  ${}  {g}\n", i + 1)),
                None => out.push_str(&format!("  ${}  (unmatched)\n", i + 1)),
            }
        }
    }
    out
}
