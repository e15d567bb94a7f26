//! # Cron Expressions — Parse, Describe, Preview
//!
//! Parses the classic five-field cron syntax into a [`CronSchedule`] holding
//! one resolved value set per field, renders a deterministic English
//! description, and finds upcoming run instants in UTC.
//!
//! ## Grammar
//!
//! ```text
//! field := item ("," item)*
//! item  := range ("/" step)?
//! range := "*" | value ("-" value)?
//! value := number | name
//! ```
//!
//! Month (`JAN`–`DEC`) and weekday (`SUN`–`SAT`) names are accepted
//! case-insensitively in their fields. Day-of-week `7` is Sunday. `N/S`
//! means "from N to the field maximum, every S". The `@yearly`,
//! `@annually`, `@monthly`, `@weekly`, `@daily`, `@midnight` and `@hourly`
//! macros expand to their five-field equivalents.
//!
//! ## Invariants
//!
//! - Every field of an accepted schedule holds a non-empty set of values
//!   within the field's bounds. Anything else is a [`SyntaxError::Cron`]
//!   naming the field.
//! - When both day-of-month and day-of-week are restricted (neither starts
//!   with `*`), a day matches if either field matches. Otherwise both must.
//! - The next-run search is bounded by a [`CronHorizon`]; exhausting it is
//!   [`ToolError::NoMatch`], never a hang.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::error::{Result, SyntaxError, ToolError};

/// Most runs [`CronSchedule::upcoming`] returns in one call.
pub const MAX_UPCOMING: usize = 1000;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

const MONTH_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const DAY_LONG: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// The five positional fields of a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 0–59.
    Minute,
    /// 0–23.
    Hour,
    /// 1–31.
    DayOfMonth,
    /// 1–12.
    Month,
    /// 0–6, Sunday = 0 (7 is accepted as Sunday).
    DayOfWeek,
}

impl FieldKind {
    const ALL: [FieldKind; 5] = [
        Self::Minute,
        Self::Hour,
        Self::DayOfMonth,
        Self::Month,
        Self::DayOfWeek,
    ];

    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day-of-month",
            Self::Month => "month",
            Self::DayOfWeek => "day-of-week",
        }
    }

    /// Inclusive bounds of the resolved values.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (1, 12),
            Self::DayOfWeek => (0, 6),
        }
    }

    /// Largest value accepted in the source text.
    fn input_max(self) -> u32 {
        match self {
            Self::DayOfWeek => 7,
            other => other.bounds().1,
        }
    }

    fn names(self) -> Option<(&'static [&'static str], u32)> {
        match self {
            Self::Month => Some((&MONTH_NAMES, 1)),
            Self::DayOfWeek => Some((&DAY_NAMES, 0)),
            _ => None,
        }
    }

    fn normalize(self, value: u32) -> u32 {
        match (self, value) {
            (Self::DayOfWeek, 7) => 0,
            _ => value,
        }
    }

    fn size(self) -> usize {
        let (lo, hi) = self.bounds();
        (hi - lo + 1) as usize
    }
}

/// One resolved field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronField {
    values: BTreeSet<u32>,
    /// The source text started with `*`.
    wildcard: bool,
}

impl CronField {
    /// Resolved values in ascending order.
    pub fn values(&self) -> &BTreeSet<u32> {
        &self.values
    }

    /// Whether `value` is in the set.
    pub fn contains(&self, value: u32) -> bool {
        self.values.contains(&value)
    }

    /// Whether the source text started with `*` (including `*/S`).
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    fn is_full(&self, kind: FieldKind) -> bool {
        self.values.len() == kind.size()
    }

    fn single(&self) -> Option<u32> {
        match self.values.len() {
            1 => self.values.iter().next().copied(),
            _ => None,
        }
    }

    /// `S` when the set is exactly `min, min+S, min+2S, ...` up to the
    /// field maximum, with `S > 1`.
    fn step(&self, kind: FieldKind) -> Option<u32> {
        let (lo, hi) = kind.bounds();
        let values: Vec<u32> = self.values.iter().copied().collect();
        if values.len() < 2 || values[0] != lo {
            return None;
        }
        let step = values[1] - values[0];
        let uniform = values.windows(2).all(|w| w[1] - w[0] == step);
        let reaches_end = values[values.len() - 1] + step > hi;
        (step > 1 && uniform && reaches_end).then_some(step)
    }
}

// ---------------------------------------------------------------------------
// Field parser
// ---------------------------------------------------------------------------

struct FieldParser<'a> {
    kind: FieldKind,
    input: &'a str,
    pos: usize,
}

impl<'a> FieldParser<'a> {
    fn parse(kind: FieldKind, input: &'a str) -> Result<CronField> {
        let mut parser = Self {
            kind,
            input,
            pos: 0,
        };
        let mut raw = BTreeSet::new();
        loop {
            parser.item(&mut raw)?;
            match parser.peek() {
                None => break,
                Some(',') => parser.pos += 1,
                Some(c) => return Err(parser.error(format!("unexpected {c:?}"))),
            }
        }
        let values = raw.into_iter().map(|v| kind.normalize(v)).collect();
        Ok(CronField {
            values,
            wildcard: input.starts_with('*'),
        })
    }

    fn item(&mut self, out: &mut BTreeSet<u32>) -> Result<()> {
        let (lo, hi, spans) = self.range()?;
        let (hi, step) = if self.eat('/') {
            let step = self.number()?;
            if step == 0 {
                return Err(self.error("step must be at least 1"));
            }
            // `N/S` runs to the end of the field.
            let hi = if spans { hi } else { self.kind.bounds().1.max(lo) };
            (hi, step)
        } else {
            (hi, 1)
        };
        let mut value = lo;
        while value <= hi {
            out.insert(value);
            match value.checked_add(step) {
                Some(next) => value = next,
                None => break,
            }
        }
        Ok(())
    }

    /// Returns `(low, high, is_span)`.
    fn range(&mut self) -> Result<(u32, u32, bool)> {
        if self.eat('*') {
            let (lo, hi) = self.kind.bounds();
            return Ok((lo, hi, true));
        }
        let lo = self.value()?;
        if self.eat('-') {
            let hi = self.value()?;
            if lo > hi {
                return Err(self.error(format!("range {lo}-{hi} runs backwards")));
            }
            Ok((lo, hi, true))
        } else {
            Ok((lo, lo, false))
        }
    }

    fn value(&mut self) -> Result<u32> {
        let value = match self.peek() {
            Some(c) if c.is_ascii_digit() => self.number()?,
            Some(c) if c.is_ascii_alphabetic() => self.name()?,
            Some(c) => return Err(self.error(format!("unexpected {c:?}"))),
            None => return Err(self.error("expected a value")),
        };
        let (lo, _) = self.kind.bounds();
        let hi = self.kind.input_max();
        if value < lo || value > hi {
            return Err(self.error(format!("value {value} is outside {lo}-{hi}")));
        }
        Ok(value)
    }

    fn number(&mut self) -> Result<u32> {
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.error("expected a number"));
        }
        digits
            .parse()
            .map_err(|_| self.error(format!("number {digits} is too large")))
    }

    fn name(&mut self) -> Result<u32> {
        let word = self.take_while(|c| c.is_ascii_alphabetic());
        let Some((names, first)) = self.kind.names() else {
            return Err(self.error(format!("names such as {word:?} are not allowed here")));
        };
        names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(word))
            .map(|idx| idx as u32 + first)
            .ok_or_else(|| self.error(format!("unknown name {word:?}")))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ToolError {
        SyntaxError::Cron {
            field: self.kind.name(),
            message: message.into(),
        }
        .into()
    }
}

fn expand_macro(expression: &str) -> Result<&str> {
    match expression.to_ascii_lowercase().as_str() {
        "@yearly" | "@annually" => Ok("0 0 1 1 *"),
        "@monthly" => Ok("0 0 1 * *"),
        "@weekly" => Ok("0 0 * * 0"),
        "@daily" | "@midnight" => Ok("0 0 * * *"),
        "@hourly" => Ok("0 * * * *"),
        "@reboot" => Err(ToolError::Unsupported(
            "@reboot has no time-based schedule".into(),
        )),
        other => Err(SyntaxError::Cron {
            field: "expression",
            message: format!("unknown macro {other:?}"),
        }
        .into()),
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Bound on how far ahead [`CronSchedule::next_run_within`] searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CronHorizon {
    years: u32,
}

impl CronHorizon {
    /// Search at most `years` years past the starting instant.
    ///
    /// # Errors
    ///
    /// [`ToolError::Range`] for zero or more than 100 years.
    pub fn years(years: u32) -> Result<Self> {
        if (1..=100).contains(&years) {
            Ok(Self { years })
        } else {
            Err(ToolError::Range(format!(
                "cron horizon of {years} years is outside 1..=100"
            )))
        }
    }
}

impl Default for CronHorizon {
    fn default() -> Self {
        Self { years: 4 }
    }
}

/// A parsed cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronSchedule {
    expression: String,
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
}

/// Parse a five-field cron expression or macro.
///
/// # Errors
///
/// [`SyntaxError::Cron`] naming the failing field, or `expression` when the
/// field count is wrong. [`ToolError::Unsupported`] for `@reboot`.
pub fn parse(expression: &str) -> Result<CronSchedule> {
    let trimmed = expression.trim();
    let expanded = if trimmed.starts_with('@') {
        expand_macro(trimmed)?
    } else {
        trimmed
    };
    let parts: Vec<&str> = expanded.split_whitespace().collect();
    if parts.len() != FieldKind::ALL.len() {
        return Err(SyntaxError::Cron {
            field: "expression",
            message: format!("expected 5 fields, found {}", parts.len()),
        }
        .into());
    }
    let schedule = CronSchedule {
        expression: parts.join(" "),
        minute: FieldParser::parse(FieldKind::Minute, parts[0])?,
        hour: FieldParser::parse(FieldKind::Hour, parts[1])?,
        day_of_month: FieldParser::parse(FieldKind::DayOfMonth, parts[2])?,
        month: FieldParser::parse(FieldKind::Month, parts[3])?,
        day_of_week: FieldParser::parse(FieldKind::DayOfWeek, parts[4])?,
    };
    tracing::debug!(expression = %schedule.expression, "parsed cron expression");
    Ok(schedule)
}

impl FromStr for CronSchedule {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl CronSchedule {
    /// Normalized five-field source text (macros expanded).
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The resolved field of the given kind.
    pub fn field(&self, kind: FieldKind) -> &CronField {
        match kind {
            FieldKind::Minute => &self.minute,
            FieldKind::Hour => &self.hour,
            FieldKind::DayOfMonth => &self.day_of_month,
            FieldKind::Month => &self.month,
            FieldKind::DayOfWeek => &self.day_of_week,
        }
    }

    /// Whether the schedule fires at the minute containing `at`.
    pub fn matches(&self, at: &DateTime<Utc>) -> bool {
        self.month.contains(at.month())
            && self.day_matches(at)
            && self.hour.contains(at.hour())
            && self.minute.contains(at.minute())
    }

    fn day_matches(&self, at: &DateTime<Utc>) -> bool {
        let dom = self.day_of_month.contains(at.day());
        let dow = self
            .day_of_week
            .contains(at.weekday().num_days_from_sunday());
        if self.day_of_month.wildcard || self.day_of_week.wildcard {
            dom && dow
        } else {
            dom || dow
        }
    }

    /// First run strictly after `from`, searching the default horizon.
    pub fn next_run(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.next_run_within(from, CronHorizon::default())
    }

    /// First run strictly after `from`, searching at most `horizon`.
    ///
    /// # Errors
    ///
    /// [`ToolError::NoMatch`] if nothing fires within the horizon, e.g. for
    /// `0 0 31 2 *`.
    pub fn next_run_within(
        &self,
        from: DateTime<Utc>,
        horizon: CronHorizon,
    ) -> Result<DateTime<Utc>> {
        let out_of_range = || ToolError::Range(format!("cannot search past {from}"));
        let mut t = truncate_to_minute(from)
            .checked_add_signed(Duration::minutes(1))
            .ok_or_else(out_of_range)?;
        let limit = t
            .checked_add_months(Months::new(12 * horizon.years))
            .ok_or_else(out_of_range)?;

        while t <= limit {
            t = if !self.month.contains(t.month()) {
                start_of_next_month(t).ok_or_else(out_of_range)?
            } else if !self.day_matches(&t) {
                start_of_next_day(t).ok_or_else(out_of_range)?
            } else if !self.hour.contains(t.hour()) {
                start_of_next_hour(t).ok_or_else(out_of_range)?
            } else if !self.minute.contains(t.minute()) {
                t.checked_add_signed(Duration::minutes(1))
                    .ok_or_else(out_of_range)?
            } else {
                return Ok(t);
            };
        }

        tracing::debug!(expression = %self.expression, years = horizon.years, "cron search exhausted");
        Err(ToolError::NoMatch(format!(
            "{} never fires within {} years of {}",
            self.expression,
            horizon.years,
            from.format("%Y-%m-%dT%H:%M:%SZ")
        )))
    }

    /// Up to `count` consecutive runs after `from`.
    ///
    /// # Errors
    ///
    /// [`ToolError::Range`] if `count` exceeds [`MAX_UPCOMING`].
    /// [`ToolError::NoMatch`] if not even the first run exists within the
    /// horizon. Later exhaustion shortens the list instead.
    pub fn upcoming(
        &self,
        from: DateTime<Utc>,
        count: usize,
        horizon: CronHorizon,
    ) -> Result<Vec<DateTime<Utc>>> {
        if count > MAX_UPCOMING {
            return Err(ToolError::Range(format!(
                "cannot preview {count} runs; the limit is {MAX_UPCOMING}"
            )));
        }
        let mut runs = Vec::new();
        let mut cursor = from;
        while runs.len() < count {
            match self.next_run_within(cursor, horizon) {
                Ok(run) => {
                    runs.push(run);
                    cursor = run;
                }
                Err(ToolError::NoMatch(_)) if !runs.is_empty() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(runs)
    }

    /// Deterministic English sentence, e.g. `every minute` or
    /// `at 04:30, on days 1 and 15 of the month or on Sunday`.
    pub fn describe(&self) -> String {
        let mut parts = vec![self.describe_time()];
        if let Some(days) = self.describe_days() {
            parts.push(days);
        }
        if !self.month.is_full(FieldKind::Month) {
            parts.push(match self.month.step(FieldKind::Month) {
                Some(step) => format!("in every {} month", ordinal(step)),
                None => format!(
                    "in {}",
                    list_phrase(&self.month.values, |m| month_name(m).to_string())
                ),
            });
        }
        parts.join(", ")
    }

    fn describe_time(&self) -> String {
        let (m, h) = (&self.minute, &self.hour);
        let minute_step = m.step(FieldKind::Minute);
        let hour_step = h.step(FieldKind::Hour);
        let hours = if h.is_full(FieldKind::Hour) {
            None
        } else {
            Some(match hour_step {
                Some(step) => format!("every {} hour", ordinal(step)),
                None => plural_list("hour", &h.values, |v| v.to_string()),
            })
        };

        if let (Some(minute), None, false) = (m.single(), hour_step, hours.is_none()) {
            if h.values.len() <= 6 {
                return format!(
                    "at {}",
                    list_phrase(&h.values, |hour| format!("{hour:02}:{minute:02}"))
                );
            }
        }

        let lead = if m.is_full(FieldKind::Minute) {
            "every minute".to_string()
        } else if let Some(step) = minute_step {
            format!("every {step} minutes")
        } else {
            format!("at {}", plural_list("minute", &m.values, |v| v.to_string()))
        };
        match hours {
            Some(hours) => format!("{lead} past {hours}"),
            None if minute_step.is_none() && !m.is_full(FieldKind::Minute) => {
                format!("{lead} of every hour")
            }
            None => lead,
        }
    }

    fn describe_days(&self) -> Option<String> {
        let dom = (!self.day_of_month.is_full(FieldKind::DayOfMonth)).then(|| {
            match self.day_of_month.step(FieldKind::DayOfMonth) {
                Some(step) => format!("on every {} day of the month", ordinal(step)),
                None => format!(
                    "on {} of the month",
                    plural_list("day", &self.day_of_month.values, |v| v.to_string())
                ),
            }
        });
        let dow = (!self.day_of_week.is_full(FieldKind::DayOfWeek)).then(|| {
            format!(
                "on {}",
                list_phrase(&self.day_of_week.values, |d| day_name(d).to_string())
            )
        });
        match (dom, dow) {
            (Some(dom), Some(dow)) if self.day_of_month.wildcard || self.day_of_week.wildcard => {
                Some(format!("{dom} if it is also {}", &dow[3..]))
            }
            (Some(dom), Some(dow)) => Some(format!("{dom} or {dow}")),
            (dom, dow) => dom.or(dow),
        }
    }
}

fn truncate_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .unwrap_or(t)
}

fn start_of_next_month(t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (year, month) = if t.month() == 12 {
        (t.year() + 1, 1)
    } else {
        (t.year(), t.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|n| n.and_utc())
}

fn start_of_next_day(t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    t.date_naive()
        .succ_opt()?
        .and_hms_opt(0, 0, 0)
        .map(|n| n.and_utc())
}

fn start_of_next_hour(t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    t.with_minute(0)?.checked_add_signed(Duration::hours(1))
}

fn month_name(month: u32) -> &'static str {
    MONTH_LONG[(month as usize).saturating_sub(1) % 12]
}

fn day_name(day: u32) -> &'static str {
    DAY_LONG[day as usize % 7]
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// `minute 5`, `minutes 0 and 30`, `hours 9 through 17`.
fn plural_list(noun: &str, values: &BTreeSet<u32>, render: impl Fn(u32) -> String) -> String {
    let noun = if values.len() == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    };
    format!("{noun} {}", list_phrase(values, render))
}

/// Joins values as `a`, `a and b` or `a, b and c`, collapsing runs of three
/// or more consecutive values into `x through y`.
fn list_phrase(values: &BTreeSet<u32>, render: impl Fn(u32) -> String) -> String {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for &v in values {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == v => *end = v,
            _ => runs.push((v, v)),
        }
    }
    let mut items = Vec::new();
    for (start, end) in runs {
        match end - start {
            0 => items.push(render(start)),
            1 => {
                items.push(render(start));
                items.push(render(end));
            }
            _ => items.push(format!("{} through {}", render(start), render(end))),
        }
    }
    match items.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}
