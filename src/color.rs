//! Color value types: linear RGB, HSV, and the 8-bit display form.
//!
//! The picker carries colors as linear-space HSV while editing. Themes store
//! linear RGB. Hex text and swatch rendering go through [`Rgba8`], optionally
//! sRGB encoded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::math;

/// Linear-light RGBA color with components nominally in the 0.0–1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// HSV color. `h` is in degrees [0, 360), `s`, `v` and `a` in 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
    pub a: f64,
}

/// 8-bit RGBA, the form written to hex text and painted into swatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for LinearColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl LinearColor {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to HSV. Hue is 0 for achromatic colors.
    pub fn to_hsv(&self) -> Hsv {
        let (h, s, v) = math::rgb_to_hsv(self.r, self.g, self.b);
        Hsv { h, s, v, a: self.a }
    }

    /// Quantize to 8 bits per channel, applying the sRGB curve to the color
    /// channels when `srgb` is set. Alpha is always linear.
    pub fn quantize(&self, srgb: bool) -> Rgba8 {
        Rgba8 {
            r: math::quantize(self.r, srgb),
            g: math::quantize(self.g, srgb),
            b: math::quantize(self.b, srgb),
            a: math::quantize(self.a, false),
        }
    }

    /// Format as 8 uppercase hex characters (RRGGBBAA), no `#` prefix.
    pub fn to_hex(&self, srgb: bool) -> String {
        self.quantize(srgb).to_hex()
    }

    /// Format as 6 uppercase hex characters (RRGGBB), for pickers that
    /// do not edit alpha.
    pub fn to_hex_rgb(&self, srgb: bool) -> String {
        let c = self.quantize(srgb);
        format!("{:02X}{:02X}{:02X}", c.r, c.g, c.b)
    }

    /// Parse up to 8 hex digits as RGBA. Never fails: missing trailing
    /// channels are zero and invalid characters read as zero.
    pub fn from_hex(hex: &str, srgb: bool) -> Self {
        let [r, g, b, a] = math::parse_hex_bytes(hex);
        Rgba8 { r, g, b, a }.to_linear(srgb)
    }

    /// Per-component comparison within `tolerance`.
    pub fn equals_within(&self, other: &LinearColor, tolerance: f64) -> bool {
        (self.r - other.r).abs() <= tolerance
            && (self.g - other.g).abs() <= tolerance
            && (self.b - other.b).abs() <= tolerance
            && (self.a - other.a).abs() <= tolerance
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64, a: f64) -> Self {
        Self { h, s, v, a }
    }

    /// Convert to linear RGB. Hue wraps modulo 360.
    pub fn to_linear(&self) -> LinearColor {
        let (r, g, b) = math::hsv_to_rgb(self.h, self.s, self.v);
        LinearColor { r, g, b, a: self.a }
    }

    /// Clamp into the valid ranges, wrapping hue into [0, 360).
    pub fn normalized(self) -> Self {
        let h = self.h.rem_euclid(360.0);
        Self {
            h: if h >= 360.0 { 0.0 } else { h },
            s: self.s.clamp(0.0, 1.0),
            v: self.v.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }
}

impl From<Hsv> for LinearColor {
    fn from(hsv: Hsv) -> Self {
        hsv.to_linear()
    }
}

impl From<LinearColor> for Hsv {
    fn from(c: LinearColor) -> Self {
        c.to_hsv()
    }
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Expand to linear light, decoding the sRGB curve when `srgb` is set.
    pub fn to_linear(&self, srgb: bool) -> LinearColor {
        LinearColor {
            r: math::dequantize(self.r, srgb),
            g: math::dequantize(self.g, srgb),
            b: math::dequantize(self.b, srgb),
            a: math::dequantize(self.a, false),
        }
    }
}

/// Decimal config form: `"R G B A"`.
impl fmt::Display for LinearColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected 3 or 4 decimal components, got {0:?}")]
pub struct ParseColorError(pub String);

/// Accepts whitespace or comma separated decimals. A missing alpha is 1.0.
impl FromStr for LinearColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .collect();
        let err = || ParseColorError(s.to_string());
        if !(3..=4).contains(&parts.len()) {
            return Err(err());
        }
        let mut values = [1.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse::<f64>().map_err(|_| err())?;
            if !slot.is_finite() {
                return Err(err());
            }
        }
        let [r, g, b, a] = values;
        Ok(Self { r, g, b, a })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_output_is_eight_uppercase_chars() {
        let c = LinearColor::new(1.0, 0.5, 0.0, 1.0);
        assert_eq!(c.to_hex(false), "FF8000FF");
        assert_eq!(c.to_hex_rgb(false), "FF8000");
    }

    #[test]
    fn srgb_hex_is_gamma_encoded() {
        // linear 0.2158605 sits right on sRGB byte 0x80
        let c = LinearColor::new(0.2158605, 0.0, 0.0, 1.0);
        assert_eq!(c.to_hex(true), "800000FF");
        assert_eq!(c.to_hex(false), "370000FF");
    }

    #[test]
    fn srgb_red_decodes_through_the_curve() {
        let red = LinearColor::from_hex("FF0000", true);
        assert!((red.r - 1.0).abs() < 1e-12);
        assert_eq!((red.g, red.b), (0.0, 0.0));
        // no alpha digits given
        assert_eq!(red.a, 0.0);

        let dim = LinearColor::from_hex("800000", true);
        let flat = LinearColor::from_hex("800000", false);
        assert!((dim.r - 0.2158605).abs() < 1e-4);
        assert!((flat.r - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn malformed_hex_parses_to_zero_channels() {
        let c = LinearColor::from_hex("ghijkl", false);
        assert_eq!(c, LinearColor::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn config_form_parses_spaces_and_commas() {
        let a: LinearColor = "0.25 0.5 1 0.75".parse().unwrap();
        let b: LinearColor = "0.25,0.5, 1,0.75".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, LinearColor::new(0.25, 0.5, 1.0, 0.75));
        let opaque: LinearColor = "0 0 0".parse().unwrap();
        assert_eq!(opaque.a, 1.0);
        assert!("1 2".parse::<LinearColor>().is_err());
        assert!("a b c d".parse::<LinearColor>().is_err());
    }

    #[test]
    fn display_round_trips_exactly() {
        let c = LinearColor::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(c.to_string().parse::<LinearColor>().unwrap(), c);
    }

    #[test]
    fn serializes_as_named_channels() {
        let c = LinearColor::new(0.5, 0.25, 1.0, 1.0);
        let text = toml::to_string(&c).unwrap();
        assert!(text.contains("r = 0.5"));
        assert_eq!(toml::from_str::<LinearColor>(&text).unwrap(), c);
    }

    #[test]
    fn hsv_normalization_wraps_and_clamps() {
        let hsv = Hsv::new(-30.0, 1.5, -0.2, 2.0).normalized();
        assert_eq!(hsv, Hsv::new(330.0, 1.0, 0.0, 1.0));
    }
}
