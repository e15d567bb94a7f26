//! # Pattern Engine Adapter
//!
//! Compiles a user-supplied regular expression with JavaScript-style flag
//! letters and enumerates its matches over a text.
//!
//! Matches come back left to right and never overlap. Offsets are UTF-8
//! byte offsets into the searched text. The `regex` engine runs in linear
//! time and always advances past an empty match, so patterns such as `a*`
//! terminate on any finite input.

use std::str::FromStr;

use regex::{Captures, Regex, RegexBuilder};
use serde::Serialize;

use crate::error::{Result, SyntaxError, ToolError};

/// Compiled program size cap. Keeps pathological user patterns from
/// allocating unbounded memory.
const SIZE_LIMIT: usize = 10 * (1 << 20);

/// Flag letters accepted by [`Pattern::new`].
///
/// | Letter | Meaning |
/// |---|---|
/// | `g` | global; accepted for compatibility, matching is always global |
/// | `i` | case-insensitive |
/// | `m` | `^`/`$` match at line boundaries |
/// | `s` | `.` matches `\n` |
/// | `x` | ignore whitespace and `#` comments in the pattern |
/// | `U` | swap greedy and lazy quantifiers |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternFlags {
    /// `i`
    pub case_insensitive: bool,
    /// `m`
    pub multi_line: bool,
    /// `s`
    pub dot_matches_new_line: bool,
    /// `x`
    pub ignore_whitespace: bool,
    /// `U`
    pub swap_greed: bool,
}

impl FromStr for PatternFlags {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        let mut flags = Self::default();
        for c in s.trim().chars() {
            match c {
                'g' => {}
                'i' => flags.case_insensitive = true,
                'm' => flags.multi_line = true,
                's' => flags.dot_matches_new_line = true,
                'x' => flags.ignore_whitespace = true,
                'U' => flags.swap_greed = true,
                other => {
                    return Err(SyntaxError::Pattern(format!("unknown flag {other:?}")).into());
                }
            }
        }
        Ok(flags)
    }
}

/// One occurrence of a pattern in the searched text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// The matched text.
    pub text: String,
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
    /// Capture groups 1..=n in pattern order; `None` for groups that did
    /// not participate in this match.
    pub groups: Vec<Option<String>>,
}

impl MatchRecord {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let groups = caps
            .iter()
            .skip(1)
            .map(|g| g.map(|m| m.as_str().to_string()))
            .collect();
        Some(Self {
            text: whole.as_str().to_string(),
            start: whole.start(),
            end: whole.end(),
            groups,
        })
    }
}

/// A compiled user pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    flags: PatternFlags,
}

impl Pattern {
    /// Compile `pattern` with the given flag letters.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::Pattern`] carrying the engine's diagnostic for invalid
    /// syntax, or naming an unknown flag letter.
    pub fn new(pattern: &str, flags: &str) -> Result<Self> {
        let flags: PatternFlags = flags.parse()?;
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_matches_new_line)
            .ignore_whitespace(flags.ignore_whitespace)
            .swap_greed(flags.swap_greed)
            .size_limit(SIZE_LIMIT)
            .build()
            .map_err(|e| SyntaxError::Pattern(e.to_string()))?;
        Ok(Self { regex, flags })
    }

    /// The flags this pattern was compiled with.
    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    /// Number of capture groups, excluding the implicit whole-match group.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Group names in pattern order; `None` for unnamed groups.
    pub fn group_names(&self) -> Vec<Option<String>> {
        self.regex
            .capture_names()
            .skip(1)
            .map(|n| n.map(str::to_string))
            .collect()
    }

    /// Lazily enumerate matches over `text`. Each call starts a fresh scan
    /// from the beginning of the text.
    pub fn matches<'r, 't>(&'r self, text: &'t str) -> Matches<'r, 't> {
        Matches {
            inner: self.regex.captures_iter(text),
        }
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Replace every match, expanding `$1` / `${name}` in `replacement`.
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        self.regex.replace_all(text, replacement).into_owned()
    }
}

/// Iterator over the matches of a [`Pattern`] in one text.
pub struct Matches<'r, 't> {
    inner: regex::CaptureMatches<'r, 't>,
}

impl Iterator for Matches<'_, '_> {
    type Item = MatchRecord;

    fn next(&mut self) -> Option<MatchRecord> {
        let caps = self.inner.next()?;
        MatchRecord::from_captures(&caps)
    }
}

/// Compile `pattern` and collect every match in `text`.
pub fn find_all(pattern: &str, flags: &str, text: &str) -> Result<Vec<MatchRecord>> {
    let compiled = Pattern::new(pattern, flags)?;
    let matches: Vec<MatchRecord> = compiled.matches(text).collect();
    tracing::trace!(pattern, matches = matches.len(), "pattern search");
    Ok(matches)
}

/// Compile `pattern` and replace every match in `text`.
pub fn replace_all(pattern: &str, flags: &str, text: &str, replacement: &str) -> Result<String> {
    Ok(Pattern::new(pattern, flags)?.replace_all(text, replacement))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_in_text() {
        let matches = find_all(r"\d+", "", "abc123def").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "123");
        assert_eq!(matches[0].start, 3);
        assert_eq!(matches[0].end, 6);
    }

    #[test]
    fn groups_are_optional() {
        let matches = find_all(r"(a)|(b)", "g", "ab").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].groups, vec![Some("a".to_string()), None]);
        assert_eq!(matches[1].groups, vec![None, Some("b".to_string())]);
    }

    #[test]
    fn named_groups_reported() {
        let pattern = Pattern::new(r"(?P<year>\d{4})-(\d{2})", "").unwrap();
        assert_eq!(pattern.group_count(), 2);
        assert_eq!(pattern.group_names(), vec![Some("year".to_string()), None]);
    }

    #[test]
    fn empty_matches_terminate_and_advance() {
        let matches = find_all("a*", "", "baaab").unwrap();
        assert!(matches.len() <= "baaab".len() + 1);
        assert!(matches.iter().any(|m| m.text == "aaa" && m.start == 1));
        for pair in matches.windows(2) {
            assert!(pair[0].end <= pair[1].start);
            assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn restartable_iteration() {
        let pattern = Pattern::new(r"\w+", "").unwrap();
        let first: Vec<_> = pattern.matches("one two").collect();
        let second: Vec<_> = pattern.matches("one two").collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn flags_change_semantics() {
        assert!(find_all("hello", "", "HELLO").unwrap().is_empty());
        assert_eq!(find_all("hello", "gi", "HELLO").unwrap().len(), 1);
        assert_eq!(find_all("^x", "m", "x\nx").unwrap().len(), 2);
        assert_eq!(find_all("a.b", "s", "a\nb").unwrap().len(), 1);
        assert_eq!(find_all("a+", "U", "aaa").unwrap().len(), 3);
    }

    #[test]
    fn unknown_flag_rejected() {
        let err = find_all("a", "q", "a").unwrap_err();
        assert!(matches!(err, ToolError::Syntax(SyntaxError::Pattern(_))));
    }

    #[test]
    fn invalid_pattern_carries_diagnostic() {
        match find_all("(unclosed", "", "x").unwrap_err() {
            ToolError::Syntax(SyntaxError::Pattern(msg)) => assert!(!msg.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unicode_classes() {
        assert_eq!(find_all(r"\p{L}+", "", "Привет").unwrap()[0].text, "Привет");
        assert_eq!(find_all(r"\p{N}+", "", "１２３").unwrap().len(), 1);
    }

    #[test]
    fn catastrophic_patterns_are_linear() {
        let input = "a".repeat(100);
        assert!(find_all("(a|a)*b", "", &input).unwrap().is_empty());
    }

    #[test]
    fn replace_expands_groups() {
        assert_eq!(
            replace_all(r"(\w+)@(\w+)", "", "me@host", "$2 at ${1}").unwrap(),
            "host at me"
        );
    }
}
