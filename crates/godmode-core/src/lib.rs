//! # godmode-core — Text and Data Transformation Primitives
//!
//! The deterministic half of the godmode toolkit: every tool here is a pure,
//! synchronous function from its explicit inputs to a `Result`. No shared
//! state, no I/O, no randomness. Cryptographic tools live in
//! `godmode-crypto`, which builds on this crate.
//!
//! ## Tools
//!
//! - [`codec`]: Base64, Base64url, Base32, Base58, hex, URL and HTML escaping.
//! - [`datauri`]: `data:` URIs with magic-byte MIME sniffing.
//! - [`json`]: pretty-print, minify and validate with line/column errors.
//! - [`radix`]: arbitrary-precision integers in bases 2 through 36.
//! - [`temporal`]: Unix epoch ⇄ ISO 8601, UTC only.
//! - [`pattern`]: regular-expression match enumeration and replacement.
//! - [`diff`]: line-level LCS edit scripts.
//! - [`cron`]: five-field cron parsing, description and run preview.
//! - [`color`]: hex / `rgb()` / `hsl()` colour notation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `godmode-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Decode and parse failures are all-or-nothing; see [`ToolError`].

pub mod codec;
pub mod color;
pub mod cron;
pub mod datauri;
pub mod diff;
pub mod error;
pub mod json;
pub mod pattern;
pub mod radix;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use codec::Format;
pub use color::Rgb;
pub use cron::{CronHorizon, CronSchedule};
pub use datauri::DataUri;
pub use diff::{DiffOp, DiffStats};
pub use error::{Result, SyntaxError, ToolError};
pub use pattern::{MatchRecord, Pattern};
pub use temporal::{EpochUnit, Timestamp};
