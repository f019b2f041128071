// Property tests for the color and slider math.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use floem_swatches::{
    Hsv, LinearColor, Rgba8, compute_exponent_slider_fraction, fraction, lerp, snap,
};
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn unit() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => 0.0..=1.0_f64,
        1 => Just(0.0),
        1 => Just(1.0),
    ]
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn rgb_survives_hsv(r in unit(), g in unit(), b in unit(), a in unit()) {
        let c = LinearColor::new(r, g, b, a);
        let back = c.to_hsv().to_linear();
        prop_assert!(back.equals_within(&c, 1e-9), "{c:?} -> {back:?}");
    }

    /// Hue is only compared when the color has one.
    #[test]
    fn hsv_survives_rgb(
        h in 0.0..360.0_f64,
        s in prop_oneof![9 => 1e-3..=1.0_f64, 1 => Just(0.0)],
        v in prop_oneof![9 => 1e-3..=1.0_f64, 1 => Just(0.0)],
        a in unit(),
    ) {
        let hsv = Hsv::new(h, s, v, a);
        let back = hsv.to_linear().to_hsv();
        prop_assert!((back.v - v).abs() < 1e-9, "{hsv:?} -> {back:?}");
        prop_assert!((back.a - a).abs() < 1e-12);
        if v > 1e-6 {
            prop_assert!((back.s - s).abs() < 1e-9, "{hsv:?} -> {back:?}");
        }
        if s > 1e-6 && v > 1e-6 {
            let d = (back.h - h).rem_euclid(360.0);
            prop_assert!(d.min(360.0 - d) < 1e-6, "{hsv:?} -> {back:?}");
        }
    }

    #[test]
    fn hsv_hue_stays_in_range(r in unit(), g in unit(), b in unit()) {
        let hsv = LinearColor::new(r, g, b, 1.0).to_hsv();
        prop_assert!((0.0..360.0).contains(&hsv.h));
        prop_assert!((0.0..=1.0).contains(&hsv.s));
    }

    #[test]
    fn hue_wraps_modulo_360(h in -720.0..720.0_f64, s in unit(), v in unit()) {
        let a = Hsv::new(h, s, v, 1.0).to_linear();
        let b = Hsv::new(h.rem_euclid(360.0), s, v, 1.0).to_linear();
        prop_assert!(a.equals_within(&b, 1e-9));
    }

    /// Bytes decoded and re-encoded in the same space give the same hex.
    #[test]
    fn hex_round_trips_in_encoded_domain(bytes in any::<[u8; 4]>(), srgb in any::<bool>()) {
        let [r, g, b, a] = bytes;
        let hex = Rgba8::new(r, g, b, a).to_hex();
        let color = LinearColor::from_hex(&hex, srgb);
        prop_assert_eq!(color.to_hex(srgb), hex);
    }

    /// A linear color quantizes to within one byte step per channel.
    #[test]
    fn linear_hex_is_within_one_step(r in unit(), g in unit(), b in unit(), a in unit()) {
        let c = LinearColor::new(r, g, b, a);
        let back = LinearColor::from_hex(&c.to_hex(false), false);
        prop_assert!(back.equals_within(&c, 1.0 / 255.0));
    }

    #[test]
    fn fraction_is_monotonic(
        min in -1e6..1e6_f64,
        span in 1e-3..1e6_f64,
        x in -2e6..2e6_f64,
        step in 0.0..1e6_f64,
    ) {
        let max = min + span;
        let lo = fraction(x, min, max);
        let hi = fraction(x + step, min, max);
        prop_assert!((0.0..=1.0).contains(&lo));
        prop_assert!(lo <= hi);
    }

    #[test]
    fn lerp_inverts_fraction(min in -1e3..1e3_f64, span in 1e-3..1e3_f64, f in unit()) {
        let max = min + span;
        let value = lerp(min, max, f);
        prop_assert!((fraction(value, min, max) - f).abs() < 1e-9);
    }

    /// Thumb position to value and back, the order a slider applies them.
    /// The other order loses precision next to the neutral point.
    #[test]
    fn exponent_warp_inverts_itself(
        f in unit(),
        neutral in 0.0..1.0_f64,
        exponent in 0.1..=1.0_f64,
    ) {
        let warped = compute_exponent_slider_fraction(f, neutral, exponent);
        prop_assert!((0.0..=1.0).contains(&warped));
        let back = compute_exponent_slider_fraction(warped, neutral, 1.0 / exponent);
        prop_assert!((back - f).abs() < 1e-9, "{f} -> {warped} -> {back}");
    }

    /// Steep curves lose precision next to the neutral point.
    #[test]
    fn steep_exponent_warp_inverts_loosely(
        f in unit(),
        neutral in 0.0..1.0_f64,
        exponent in 1.0..=3.0_f64,
    ) {
        let warped = compute_exponent_slider_fraction(f, neutral, exponent);
        prop_assert!((0.0..=1.0).contains(&warped));
        let back = compute_exponent_slider_fraction(warped, neutral, 1.0 / exponent);
        prop_assert!((back - f).abs() < 1e-4, "{f} -> {warped} -> {back}");
    }

    #[test]
    fn snap_stays_in_bounds(value in -1e4..1e4_f64, delta in 0.0..100.0_f64) {
        let s = snap(value, delta, -50.0, 50.0);
        prop_assert!((-50.0..=50.0).contains(&s));
    }
}
