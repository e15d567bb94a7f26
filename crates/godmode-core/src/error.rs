//! # Error Types — Tool Error Taxonomy
//!
//! Every public operation in the toolkit returns `Result<T, ToolError>`.
//! Nothing panics across the tool boundary: the caller (UI or CLI) decides
//! how to present a failure.
//!
//! ## Design
//!
//! - Decode and parse failures are all-or-nothing. No partial output is
//!   returned alongside an error.
//! - `Authentication` carries no detail, so a wrong passphrase and a
//!   corrupted ciphertext are indistinguishable to the caller.
//! - Syntax errors carry enough position information (line/column, cron
//!   field name) for the UI to point at the offending input.

use thiserror::Error;

/// Result alias used throughout the toolkit.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Top-level error type for every tool operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Input contained characters outside the alphabet, bad padding,
    /// a truncated escape, or a digit invalid for the declared base.
    #[error("malformed {format} input: {reason}")]
    MalformedInput {
        /// Format or tool that rejected the input (e.g. `base64`).
        format: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// Grammar failure in JSON, cron, or a regular expression.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// AEAD tag or signature mismatch.
    #[error("authentication failed")]
    Authentication,

    /// A bounded search finished without a result.
    #[error("no match: {0}")]
    NoMatch(String),

    /// A numeric parameter or value was outside its permitted bounds.
    #[error("out of range: {0}")]
    Range(String),

    /// The requested algorithm or mode is not supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl ToolError {
    /// Shorthand for [`ToolError::MalformedInput`].
    pub fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            format,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable tag for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::Syntax(_) => "syntax_error",
            Self::Authentication => "authentication_error",
            Self::NoMatch(_) => "no_match",
            Self::Range(_) => "range_error",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

/// Grammar failure with position information.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// JSON parse failure at the first offending position (1-based).
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Json {
        /// 1-based line of the failure.
        line: usize,
        /// 1-based column of the failure.
        column: usize,
        /// Parser diagnostic.
        message: String,
    },

    /// Cron grammar failure, naming the field that failed.
    #[error("invalid cron {field} field: {message}")]
    Cron {
        /// Field name (`minute`, `hour`, `day-of-month`, `month`,
        /// `day-of-week`) or `expression` for whole-expression failures.
        field: &'static str,
        /// Diagnostic.
        message: String,
    },

    /// Regular expression compile failure with the engine's diagnostic.
    #[error("invalid pattern: {0}")]
    Pattern(String),
}
