//! Color math: direct conversions without external dependencies.
//! Channels are normalized f64 in 0.0–1.0, hue is in degrees.

/// Below this linear value the sRGB curve is a straight line.
const SRGB_LINEAR_CUTOFF: f64 = 0.0031308;
/// Encoded-side counterpart of [`SRGB_LINEAR_CUTOFF`].
const SRGB_ENCODED_CUTOFF: f64 = 0.04045;

/// HSV → RGB. `h` in degrees (wrapped modulo 360), `s`/`v` 0.0–1.0.
pub(crate) fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let h6 = h.rem_euclid(360.0) / 60.0;
    let i = h6.floor() as u32;
    let f = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// RGB → HSV. Returns `h` in degrees [0, 360), `s`/`v` 0.0–1.0.
///
/// Achromatic input (zero saturation) has no defined hue and reports 0.
pub(crate) fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) * 60.0
    } else if max == g {
        ((b - r) / delta + 2.0) * 60.0
    } else {
        ((r - g) / delta + 4.0) * 60.0
    };

    // rem_euclid can land exactly on 360 through rounding
    (if h >= 360.0 { h - 360.0 } else { h }, s, v)
}

/// Linear light → sRGB-encoded value, input clamped to 0.0–1.0.
pub(crate) fn linear_to_srgb(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= SRGB_LINEAR_CUTOFF {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB-encoded value → linear light.
pub(crate) fn srgb_to_linear(c: f64) -> f64 {
    if c <= SRGB_ENCODED_CUTOFF {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Quantize a 0.0–1.0 channel to a byte.
///
/// sRGB-encoded channels use the floor form so every byte covers an equal
/// slice of the encoded range.
pub(crate) fn quantize(c: f64, srgb: bool) -> u8 {
    if srgb {
        (linear_to_srgb(c) * 255.999).floor() as u8
    } else {
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Byte → 0.0–1.0 channel, decoding the sRGB curve when `srgb` is set.
pub(crate) fn dequantize(byte: u8, srgb: bool) -> f64 {
    let c = byte as f64 / 255.0;
    if srgb { srgb_to_linear(c) } else { c }
}

/// Read up to 8 hex digits as RGBA bytes, most significant first.
///
/// Missing trailing digits are zero and characters that are not hex digits
/// read as zero, so this never fails.
pub(crate) fn parse_hex_bytes(hex: &str) -> [u8; 4] {
    let stripped = hex.trim().trim_start_matches('#');
    let mut nibbles = [0u8; 8];
    for (slot, c) in nibbles.iter_mut().zip(stripped.chars()) {
        *slot = c.to_digit(16).unwrap_or(0) as u8;
    }
    [
        (nibbles[0] << 4) | nibbles[1],
        (nibbles[2] << 4) | nibbles[3],
        (nibbles[4] << 4) | nibbles[5],
        (nibbles[6] << 4) | nibbles[7],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_convert_both_ways() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), (0.0, 1.0, 0.0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), (0.0, 0.0, 1.0));
        assert_eq!(rgb_to_hsv(0.0, 0.0, 1.0), (240.0, 1.0, 1.0));
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0));
        assert_eq!(hsv_to_rgb(-120.0, 1.0, 1.0), hsv_to_rgb(240.0, 1.0, 1.0));
    }

    #[test]
    fn gray_has_zero_hue() {
        let (h, s, v) = rgb_to_hsv(0.4, 0.4, 0.4);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((v - 0.4).abs() < 1e-12);
    }

    #[test]
    fn srgb_curve_is_continuous_at_cutoff() {
        let below = linear_to_srgb(SRGB_LINEAR_CUTOFF);
        let above = linear_to_srgb(SRGB_LINEAR_CUTOFF + 1e-9);
        assert!((below - above).abs() < 1e-6);
        assert!((srgb_to_linear(linear_to_srgb(0.5)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hex_bytes_pad_and_ignore_garbage() {
        assert_eq!(parse_hex_bytes("FF8000"), [0xFF, 0x80, 0x00, 0x00]);
        assert_eq!(parse_hex_bytes("#12345678"), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(parse_hex_bytes("F"), [0xF0, 0, 0, 0]);
        assert_eq!(parse_hex_bytes("zz10"), [0x00, 0x10, 0, 0]);
        assert_eq!(parse_hex_bytes(""), [0, 0, 0, 0]);
    }
}
