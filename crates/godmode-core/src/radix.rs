//! # Radix Converter
//!
//! Converts arbitrary-precision integers between bases 2 through 36.
//! Digits are case-insensitive on input (`a`–`z` map to 10–35) and
//! lowercase on output. A leading `-` or `+` sign is accepted; `-0`
//! renders as `0`.

use num_bigint::BigUint;
use serde::Serialize;

use crate::error::{Result, ToolError};

/// Smallest supported radix.
pub const MIN_RADIX: u32 = 2;
/// Largest supported radix.
pub const MAX_RADIX: u32 = 36;

/// A validated signed integer read from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integer {
    negative: bool,
    magnitude: BigUint,
}

impl Integer {
    /// Parse `text` as an integer in `radix`.
    ///
    /// # Errors
    ///
    /// - [`ToolError::Range`] if `radix` is outside `2..=36`.
    /// - [`ToolError::MalformedInput`] if the text is empty or holds a digit
    ///   that is not valid in `radix`.
    pub fn parse(text: &str, radix: u32) -> Result<Self> {
        check_radix(radix)?;
        let trimmed = text.trim();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        if digits.is_empty() {
            return Err(ToolError::malformed("radix", "no digits"));
        }
        if let Some(bad) = digits.chars().find(|c| c.to_digit(radix).is_none()) {
            return Err(ToolError::malformed(
                "radix",
                format!("digit {bad:?} is not valid in base {radix}"),
            ));
        }
        let magnitude = BigUint::parse_bytes(digits.as_bytes(), radix)
            .ok_or_else(|| ToolError::malformed("radix", format!("invalid base {radix} number")))?;
        let negative = negative && magnitude != BigUint::default();
        Ok(Self { negative, magnitude })
    }

    /// Render in `radix` with lowercase digits.
    ///
    /// # Errors
    ///
    /// [`ToolError::Range`] if `radix` is outside `2..=36`.
    pub fn to_radix(&self, radix: u32) -> Result<String> {
        check_radix(radix)?;
        let digits = self.magnitude.to_str_radix(radix);
        Ok(if self.negative {
            format!("-{digits}")
        } else {
            digits
        })
    }
}

/// Convert `number` written in `from` into base `to`.
pub fn convert(number: &str, from: u32, to: u32) -> Result<String> {
    check_radix(to)?;
    let value = Integer::parse(number, from)?;
    tracing::trace!(from, to, digits = number.len(), "radix conversion");
    value.to_radix(to)
}

/// The four renditions a base-converter UI shows side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonBases {
    /// Base 2.
    pub binary: String,
    /// Base 8.
    pub octal: String,
    /// Base 10.
    pub decimal: String,
    /// Base 16.
    pub hex: String,
}

/// Render `number` (written in `from`) in binary, octal, decimal and hex.
pub fn all_bases(number: &str, from: u32) -> Result<CommonBases> {
    let value = Integer::parse(number, from)?;
    Ok(CommonBases {
        binary: value.to_radix(2)?,
        octal: value.to_radix(8)?,
        decimal: value.to_radix(10)?,
        hex: value.to_radix(16)?,
    })
}

fn check_radix(radix: u32) -> Result<()> {
    if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
        Ok(())
    } else {
        Err(ToolError::Range(format!(
            "radix {radix} is outside {MIN_RADIX}..={MAX_RADIX}"
        )))
    }
}
