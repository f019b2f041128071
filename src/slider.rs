//! Slider fraction mapping.
//!
//! Maps a numeric value inside `[min, max]` to a normalized 0.0–1.0 slider
//! fraction, optionally warped exponentially around a neutral point so that
//! precision concentrates near that point on both sides.

use std::fmt::Debug;
use std::str::FromStr;

/// Numeric types a spin box or slider can drive.
pub trait SliderNumeric: Copy + PartialOrd + Debug + 'static {
    /// Integral types round the accumulated float value on every commit.
    const INTEGRAL: bool;
    const LOWEST: Self;
    const HIGHEST: Self;

    fn to_f64(self) -> f64;
    /// Saturating conversion; integral types round to nearest.
    fn from_f64(value: f64) -> Self;
    /// Parse user text. Integral types also accept decimal text and round it.
    fn parse_text(text: &str) -> Option<Self>;
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl SliderNumeric for $t {
            const INTEGRAL: bool = false;
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn parse_text(text: &str) -> Option<Self> {
                <$t>::from_str(text.trim()).ok().filter(|v| v.is_finite())
            }
        }
    )*};
}

macro_rules! impl_integer {
    ($($t:ty),*) => {$(
        impl SliderNumeric for $t {
            const INTEGRAL: bool = true;
            const LOWEST: Self = <$t>::MIN;
            const HIGHEST: Self = <$t>::MAX;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                // `as` saturates at the type bounds
                value.round() as $t
            }

            fn parse_text(text: &str) -> Option<Self> {
                let text = text.trim();
                <$t>::from_str(text).ok().or_else(|| {
                    f64::from_str(text)
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(Self::from_f64)
                })
            }
        }
    )*};
}

impl_float!(f32, f64);
impl_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Linear position of `value` within `[min, max]`, clamped to 0.0–1.0.
///
/// Uses halved operands so the difference of two very large bounds does not
/// overflow. A degenerate range reports 1.0 once `value` reaches `max`.
pub fn fraction(value: f64, min: f64, max: f64) -> f64 {
    let half_range = max / 2.0 - min / 2.0;
    if half_range == 0.0 {
        return if value >= max { 1.0 } else { 0.0 };
    }
    let f = (value / 2.0 - min / 2.0) / half_range;
    if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) }
}

/// Inverse of [`fraction`] for finite bounds.
pub fn lerp(min: f64, max: f64, fraction: f64) -> f64 {
    // same halving as `fraction`
    (min / 2.0 + (max / 2.0 - min / 2.0) * fraction) * 2.0
}

/// Warp a linear slider fraction around `neutral`.
///
/// Each side of the neutral point is remapped on its own segment: the
/// normalized distance `d` from the neutral point becomes `d^exponent`.
/// Applying the result again with `1 / exponent` recovers the input.
pub fn compute_exponent_slider_fraction(fraction: f64, neutral: f64, exponent: f64) -> f64 {
    if fraction <= neutral {
        if neutral <= 0.0 {
            return 0.0;
        }
        let d = 1.0 - fraction / neutral;
        neutral * (1.0 - d.max(0.0).powf(exponent))
    } else {
        if neutral >= 1.0 {
            return 1.0;
        }
        let d = (fraction - neutral) / (1.0 - neutral);
        neutral + (1.0 - neutral) * d.max(0.0).powf(exponent)
    }
}

/// Round to the nearest multiple of `delta` and clamp into `[min, max]`.
/// A zero delta only clamps.
pub fn snap(value: f64, delta: f64, min: f64, max: f64) -> f64 {
    let snapped = if delta != 0.0 {
        (value / delta).round() * delta
    } else {
        value
    };
    snapped.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_endpoints() {
        assert_eq!(fraction(-10.0, -10.0, 30.0), 0.0);
        assert_eq!(fraction(30.0, -10.0, 30.0), 1.0);
        assert_eq!(fraction(10.0, -10.0, 30.0), 0.5);
        assert_eq!(fraction(100.0, -10.0, 30.0), 1.0);
        assert_eq!(fraction(-100.0, -10.0, 30.0), 0.0);
    }

    #[test]
    fn fraction_survives_huge_ranges() {
        let f = fraction(0.0, f64::MIN, f64::MAX);
        assert!((f - 0.5).abs() < 1e-12);
        assert_eq!(fraction(f64::MAX, f64::MIN, f64::MAX), 1.0);
    }

    #[test]
    fn degenerate_range() {
        assert_eq!(fraction(5.0, 5.0, 5.0), 1.0);
        assert_eq!(fraction(4.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn exponent_one_is_identity() {
        for f in [0.0, 0.1, 0.3, 0.5, 0.9, 1.0] {
            assert!((compute_exponent_slider_fraction(f, 0.3, 1.0) - f).abs() < 1e-12);
        }
    }

    #[test]
    fn exponent_concentrates_near_neutral() {
        // just right of neutral the warped fraction moves slower than linear
        let n = 0.5;
        let warped = compute_exponent_slider_fraction(0.6, n, 3.0);
        assert!(warped > n && warped < 0.6);
        let warped = compute_exponent_slider_fraction(0.4, n, 3.0);
        assert!(warped < n && warped > 0.4);
        assert_eq!(compute_exponent_slider_fraction(n, n, 3.0), n);
        assert_eq!(compute_exponent_slider_fraction(0.0, n, 3.0), 0.0);
        assert_eq!(compute_exponent_slider_fraction(1.0, n, 3.0), 1.0);
    }

    #[test]
    fn exponent_edge_neutrals() {
        assert!((compute_exponent_slider_fraction(0.5, 0.0, 2.0) - 0.25).abs() < 1e-12);
        assert!((compute_exponent_slider_fraction(0.5, 1.0, 2.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn snap_rounds_then_clamps() {
        assert_eq!(snap(0.26, 0.25, 0.0, 1.0), 0.25);
        assert_eq!(snap(7.0, 5.0, 0.0, 100.0), 5.0);
        assert_eq!(snap(98.0, 5.0, 0.0, 97.0), 97.0);
        assert_eq!(snap(0.123, 0.0, 0.0, 1.0), 0.123);
    }

    #[test]
    fn integral_numerics_round_and_saturate() {
        assert_eq!(<i32 as SliderNumeric>::from_f64(2.6), 3);
        assert_eq!(<u8 as SliderNumeric>::from_f64(300.0), 255);
        assert_eq!(<u8 as SliderNumeric>::from_f64(-4.0), 0);
        assert_eq!(<i32 as SliderNumeric>::parse_text(" 12 "), Some(12));
        assert_eq!(<i32 as SliderNumeric>::parse_text("12.7"), Some(13));
        assert_eq!(<i32 as SliderNumeric>::parse_text("twelve"), None);
        assert_eq!(<f32 as SliderNumeric>::parse_text("inf"), None);
    }
}
