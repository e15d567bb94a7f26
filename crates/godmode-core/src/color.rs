//! Colour notation converter: `#rrggbb`, `#rgb` and `rgb(r, g, b)` in;
//! hex, `rgb()` and `hsl()` out.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, ToolError};

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse hex (`#` optional, 3 or 6 digits, any case) or `rgb(r, g, b)`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        if let Some(inner) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(inner);
        }
        parse_hex(text.strip_prefix('#').unwrap_or(text))
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgb(r, g, b)`.
    pub fn to_rgb_function(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Hue in degrees, saturation and lightness in percent, each rounded.
    pub fn to_hsl(self) -> (u16, u8, u8) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        if delta == 0.0 {
            return (0, 0, (l * 100.0).round() as u8);
        }
        let s = delta / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        (
            (h.round() as u16) % 360,
            (s * 100.0).round() as u8,
            (l * 100.0).round() as u8,
        )
    }

    /// `hsl(h, s%, l%)`.
    pub fn to_hsl_function(self) -> String {
        let (h, s, l) = self.to_hsl();
        format!("hsl({h}, {s}%, {l}%)")
    }
}

impl FromStr for Rgb {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Every rendering the colour tool shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorReport {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
}

impl From<Rgb> for ColorReport {
    fn from(c: Rgb) -> Self {
        Self {
            hex: c.to_hex(),
            rgb: c.to_rgb_function(),
            hsl: c.to_hsl_function(),
        }
    }
}

/// Parse any accepted notation and render all of them.
pub fn convert(text: &str) -> Result<ColorReport> {
    Rgb::parse(text).map(ColorReport::from)
}

fn parse_hex(digits: &str) -> Result<Rgb> {
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        n => {
            return Err(ToolError::malformed(
                "color",
                format!("hex colour needs 3 or 6 digits, found {n}"),
            ))
        }
    };
    let bytes = hex::decode(&expanded)
        .map_err(|_| ToolError::malformed("color", format!("{digits:?} is not hexadecimal")))?;
    Ok(Rgb::new(bytes[0], bytes[1], bytes[2]))
}

fn parse_functional(inner: &str) -> Result<Rgb> {
    let channels: Vec<&str> = inner.split(',').map(str::trim).collect();
    let [r, g, b] = channels.as_slice() else {
        return Err(ToolError::malformed(
            "color",
            format!("rgb() takes 3 channels, found {}", channels.len()),
        ));
    };
    let channel = |text: &str| -> Result<u8> {
        let value: u16 = text
            .parse()
            .map_err(|_| ToolError::malformed("color", format!("{text:?} is not a channel value")))?;
        u8::try_from(value)
            .map_err(|_| ToolError::Range(format!("channel value {value} is outside 0..=255")))
    };
    Ok(Rgb::new(channel(r)?, channel(g)?, channel(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_notation() {
        let coral = Rgb::new(255, 127, 80);
        assert_eq!(Rgb::parse("#ff7f50").unwrap(), coral);
        assert_eq!(Rgb::parse("FF7F50").unwrap(), coral);
        assert_eq!(Rgb::parse("rgb(255, 127, 80)").unwrap(), coral);
        assert_eq!(Rgb::parse("  RGB(255,127,80) ").unwrap(), coral);
        assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::parse("#0a0").unwrap(), Rgb::new(0, 170, 0));
    }

    #[test]
    fn renders_hex_rgb_and_hsl() {
        let report = convert("#ff0000").unwrap();
        assert_eq!(report.hex, "#ff0000");
        assert_eq!(report.rgb, "rgb(255, 0, 0)");
        assert_eq!(report.hsl, "hsl(0, 100%, 50%)");
    }

    #[test]
    fn hsl_reference_values() {
        assert_eq!(Rgb::new(0, 0, 0).to_hsl(), (0, 0, 0));
        assert_eq!(Rgb::new(255, 255, 255).to_hsl(), (0, 0, 100));
        assert_eq!(Rgb::new(0, 255, 0).to_hsl(), (120, 100, 50));
        assert_eq!(Rgb::new(0, 0, 255).to_hsl(), (240, 100, 50));
        assert_eq!(Rgb::new(128, 128, 128).to_hsl(), (0, 0, 50));
        assert_eq!(Rgb::new(255, 0, 255).to_hsl(), (300, 100, 50));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Rgb::parse("#ff00").unwrap_err().kind(), "malformed_input");
        assert_eq!(Rgb::parse("#gggggg").unwrap_err().kind(), "malformed_input");
        assert_eq!(Rgb::parse("rgb(1, 2)").unwrap_err().kind(), "malformed_input");
        assert_eq!(Rgb::parse("rgb(256, 0, 0)").unwrap_err().kind(), "range_error");
        assert_eq!(Rgb::parse("rgb(-1, 0, 0)").unwrap_err().kind(), "malformed_input");
        assert!(Rgb::parse("").is_err());
    }
}
