//! # Line Diff Engine
//!
//! Computes a line-level edit script between two texts with Myers'
//! linear-space algorithm (via `similar`), then groups consecutive lines
//! with the same tag into runs.
//!
//! ## Invariants
//!
//! - Lines keep their terminators (`\n`, `\r\n`), so concatenating every
//!   `Equal` and `Delete` line reproduces the left text byte for byte, and
//!   every `Equal` and `Insert` line reproduces the right text.
//! - Scripts are minimal and deterministic. Shared leading and trailing
//!   lines are always matched first, so a repeated line matches leftmost.
//!   Within a changed region deletions come before insertions.
//! - If the search runs past [`DIFF_DEADLINE`] the script is still valid
//!   but may be longer than minimal.

use std::time::{Duration, Instant};

use serde::Serialize;
use similar::{Algorithm, DiffTag};

/// Wall-clock budget for the minimal-script search.
pub const DIFF_DEADLINE: Duration = Duration::from_secs(2);

/// One run of lines in an edit script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "lines", rename_all = "lowercase")]
pub enum DiffOp {
    /// Lines present in both texts.
    Equal(Vec<String>),
    /// Lines only in the right text.
    Insert(Vec<String>),
    /// Lines only in the left text.
    Delete(Vec<String>),
}

impl DiffOp {
    /// The lines in this run.
    pub fn lines(&self) -> &[String] {
        match self {
            Self::Equal(lines) | Self::Insert(lines) | Self::Delete(lines) => lines,
        }
    }
}

/// Line counts per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiffStats {
    /// Unchanged lines.
    pub equal: usize,
    /// Lines added on the right.
    pub inserted: usize,
    /// Lines removed from the left.
    pub deleted: usize,
}

/// Split text into lines, each keeping its terminator.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Compute the line-level edit script from `left` to `right`.
pub fn diff_lines(left: &str, right: &str) -> Vec<DiffOp> {
    let a = split_lines(left);
    let b = split_lines(right);
    let deadline = Instant::now().checked_add(DIFF_DEADLINE);
    let edits = similar::capture_diff_slices_deadline(Algorithm::Myers, &a, &b, deadline);

    let mut runs = Runs::default();
    for edit in &edits {
        let (tag, old, new) = edit.as_tag_tuple();
        match tag {
            DiffTag::Equal => runs.equal(&a[old]),
            DiffTag::Delete => runs.deleted.extend(a[old].iter().map(|l| l.to_string())),
            DiffTag::Insert => runs.inserted.extend(b[new].iter().map(|l| l.to_string())),
            DiffTag::Replace => {
                runs.deleted.extend(a[old].iter().map(|l| l.to_string()));
                runs.inserted.extend(b[new].iter().map(|l| l.to_string()));
            }
        }
    }

    tracing::trace!(left_lines = a.len(), right_lines = b.len(), edits = edits.len(), "line diff computed");
    runs.finish()
}

/// Accumulates pending changes so each changed region is emitted as one
/// `Delete` run followed by one `Insert` run.
#[derive(Default)]
struct Runs {
    ops: Vec<DiffOp>,
    deleted: Vec<String>,
    inserted: Vec<String>,
}

impl Runs {
    fn equal(&mut self, lines: &[&str]) {
        if lines.is_empty() {
            return;
        }
        self.flush_changes();
        let lines = lines.iter().map(|l| l.to_string());
        match self.ops.last_mut() {
            Some(DiffOp::Equal(run)) => run.extend(lines),
            _ => self.ops.push(DiffOp::Equal(lines.collect())),
        }
    }

    fn flush_changes(&mut self) {
        if !self.deleted.is_empty() {
            self.ops.push(DiffOp::Delete(std::mem::take(&mut self.deleted)));
        }
        if !self.inserted.is_empty() {
            self.ops.push(DiffOp::Insert(std::mem::take(&mut self.inserted)));
        }
    }

    fn finish(mut self) -> Vec<DiffOp> {
        self.flush_changes();
        self.ops
    }
}

/// Count lines per tag.
pub fn stats(ops: &[DiffOp]) -> DiffStats {
    ops.iter().fold(DiffStats::default(), |mut s, op| {
        match op {
            DiffOp::Equal(l) => s.equal += l.len(),
            DiffOp::Insert(l) => s.inserted += l.len(),
            DiffOp::Delete(l) => s.deleted += l.len(),
        }
        s
    })
}

/// Reassemble the left text from `Equal` and `Delete` runs.
pub fn reconstruct_left(ops: &[DiffOp]) -> String {
    ops.iter()
        .filter(|op| !matches!(op, DiffOp::Insert(_)))
        .flat_map(DiffOp::lines)
        .map(String::as_str)
        .collect()
}

/// Reassemble the right text from `Equal` and `Insert` runs.
pub fn reconstruct_right(ops: &[DiffOp]) -> String {
    ops.iter()
        .filter(|op| !matches!(op, DiffOp::Delete(_)))
        .flat_map(DiffOp::lines)
        .map(String::as_str)
        .collect()
}

/// Render with `  `, `- ` and `+ ` prefixes, one line per output line.
pub fn render(ops: &[DiffOp]) -> String {
    let mut out = String::new();
    for op in ops {
        let prefix = match op {
            DiffOp::Equal(_) => "  ",
            DiffOp::Delete(_) => "- ",
            DiffOp::Insert(_) => "+ ",
        };
        for line in op.lines() {
            out.push_str(prefix);
            out.push_str(line.trim_end_matches(['\n', '\r']));
            out.push('\n');
        }
    }
    out
}
