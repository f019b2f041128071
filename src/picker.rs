//! Picker session and the application-owned state around it.
//!
//! [`PickerContext`] owns everything that outlives a single picker: the
//! theme store, the persisted UI toggles and the one open session. Opening a
//! picker while another is open closes the old one first.

use tracing::debug;

use crate::color::{Hsv, LinearColor};
use crate::config::{ConfigStore, PickerSettings};
use crate::drag::ColorDragPayload;
use crate::spin_box::SpinBoxConfig;
use crate::theme::ColorThemeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
    Alpha,
    Hue,
    Saturation,
    Value,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 7] = [
        ColorChannel::Red,
        ColorChannel::Green,
        ColorChannel::Blue,
        ColorChannel::Alpha,
        ColorChannel::Hue,
        ColorChannel::Saturation,
        ColorChannel::Value,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColorChannel::Red => "R",
            ColorChannel::Green => "G",
            ColorChannel::Blue => "B",
            ColorChannel::Alpha => "A",
            ColorChannel::Hue => "H",
            ColorChannel::Saturation => "S",
            ColorChannel::Value => "V",
        }
    }

    /// This channel's value in `hsv`. RGB channels are linear.
    pub fn value_of(self, hsv: Hsv) -> f64 {
        match self {
            ColorChannel::Red => hsv.to_linear().r,
            ColorChannel::Green => hsv.to_linear().g,
            ColorChannel::Blue => hsv.to_linear().b,
            ColorChannel::Alpha => hsv.a,
            ColorChannel::Hue => hsv.h,
            ColorChannel::Saturation => hsv.s,
            ColorChannel::Value => hsv.v,
        }
    }

    /// Spin box setup for this channel's slider.
    pub fn spin_config(self) -> SpinBoxConfig<f64> {
        match self {
            ColorChannel::Hue => SpinBoxConfig::new(0.0).with_range(0.0, 360.0),
            _ => SpinBoxConfig::new(0.0).with_range(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPickerArgs {
    pub initial: LinearColor,
    pub use_alpha: bool,
}

impl ColorPickerArgs {
    pub fn new(initial: LinearColor) -> Self {
        Self {
            initial,
            use_alpha: true,
        }
    }
}

/// State of one open picker. Edits happen in HSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPickerSession {
    id: u64,
    original: LinearColor,
    current: Hsv,
    use_alpha: bool,
    srgb: bool,
}

impl ColorPickerSession {
    fn new(id: u64, args: ColorPickerArgs, srgb: bool) -> Self {
        Self {
            id,
            original: args.initial,
            current: args.initial.to_hsv().normalized(),
            use_alpha: args.use_alpha,
            srgb,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn original(&self) -> LinearColor {
        self.original
    }

    pub fn hsv(&self) -> Hsv {
        self.current
    }

    pub fn color(&self) -> LinearColor {
        self.current.to_linear()
    }

    pub fn use_alpha(&self) -> bool {
        self.use_alpha
    }

    pub fn srgb(&self) -> bool {
        self.srgb
    }

    pub fn set_srgb(&mut self, srgb: bool) {
        self.srgb = srgb;
    }

    pub fn set_hsv(&mut self, hsv: Hsv) {
        self.current = hsv.normalized();
    }

    /// Set from linear RGB. The hue is kept when the new color is gray so
    /// dragging saturation back up restores it.
    pub fn set_color(&mut self, color: LinearColor) {
        let mut hsv = color.to_hsv();
        if hsv.s == 0.0 {
            hsv.h = self.current.h;
        }
        self.current = hsv.normalized();
    }

    pub fn channel(&self, channel: ColorChannel) -> f64 {
        channel.value_of(self.current)
    }

    pub fn set_channel(&mut self, channel: ColorChannel, value: f64) {
        let mut rgb = self.color();
        match channel {
            ColorChannel::Red => rgb.r = value.clamp(0.0, 1.0),
            ColorChannel::Green => rgb.g = value.clamp(0.0, 1.0),
            ColorChannel::Blue => rgb.b = value.clamp(0.0, 1.0),
            ColorChannel::Alpha => {
                self.current.a = value.clamp(0.0, 1.0);
                return;
            }
            ColorChannel::Hue => {
                self.current = Hsv { h: value, ..self.current }.normalized();
                return;
            }
            ColorChannel::Saturation => {
                self.current.s = value.clamp(0.0, 1.0);
                return;
            }
            ColorChannel::Value => {
                self.current.v = value.clamp(0.0, 1.0);
                return;
            }
        }
        self.set_color(rgb);
    }

    /// Hex display of the current color, 8 digits with alpha or 6 without.
    pub fn hex_text(&self) -> String {
        if self.use_alpha {
            self.color().to_hex(self.srgb)
        } else {
            self.color().to_hex_rgb(self.srgb)
        }
    }

    /// Apply typed hex text. Text with anything other than hex digits (after
    /// an optional `#`) is ignored and the previous color stays. Returns
    /// whether the color changed.
    pub fn apply_hex_text(&mut self, text: &str) -> bool {
        let digits = text.trim().trim_start_matches('#');
        if digits.is_empty() || digits.len() > 8 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            debug!(text, "ignoring malformed hex text");
            return false;
        }
        let mut color = LinearColor::from_hex(digits, self.srgb);
        if !self.use_alpha || digits.len() <= 6 {
            color.a = self.current.a;
        }
        let before = self.current;
        self.set_color(color);
        self.current != before
    }

    /// Payload for dragging the preview block onto a theme bar.
    pub fn drag_payload(&self) -> ColorDragPayload {
        ColorDragPayload::new(self.current, self.use_alpha, self.srgb)
    }

    /// Final color. Alpha is forced opaque when the caller does not use it.
    pub fn commit(&self) -> LinearColor {
        let color = self.color();
        if self.use_alpha { color } else { color.with_alpha(1.0) }
    }

    /// Color to hand back when the picker is dismissed.
    pub fn cancel(&self) -> LinearColor {
        self.original
    }
}

#[derive(Debug)]
pub struct PickerContext<C: ConfigStore> {
    themes: ColorThemeStore<C>,
    settings: PickerSettings,
    picker: Option<ColorPickerSession>,
    next_session: u64,
}

impl<C: ConfigStore> PickerContext<C> {
    /// Load settings and themes from `config`.
    pub fn new(config: C) -> Self {
        let settings = PickerSettings::load(&config);
        Self {
            themes: ColorThemeStore::load(config),
            settings,
            picker: None,
            next_session: 0,
        }
    }

    pub fn themes(&self) -> &ColorThemeStore<C> {
        &self.themes
    }

    pub fn themes_mut(&mut self) -> &mut ColorThemeStore<C> {
        &mut self.themes
    }

    pub fn settings(&self) -> PickerSettings {
        self.settings
    }

    /// Change and persist the UI toggles. The sRGB toggle applies to the open
    /// picker immediately.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut PickerSettings)) {
        f(&mut self.settings);
        self.settings.save(self.themes.config_mut());
        if let Some(picker) = self.picker.as_mut() {
            picker.set_srgb(self.settings.srgb_enabled);
        }
    }

    /// Open a picker, closing (and returning) any picker that was open.
    pub fn open_picker(&mut self, args: ColorPickerArgs) -> Option<ColorPickerSession> {
        self.next_session += 1;
        let previous = self.picker.take();
        if let Some(previous) = &previous {
            debug!(session = previous.id(), "replacing open color picker");
        }
        self.picker = Some(ColorPickerSession::new(
            self.next_session,
            args,
            self.settings.srgb_enabled,
        ));
        previous
    }

    pub fn picker(&self) -> Option<&ColorPickerSession> {
        self.picker.as_ref()
    }

    pub fn picker_mut(&mut self) -> Option<&mut ColorPickerSession> {
        self.picker.as_mut()
    }

    /// Close the open picker, returning the committed color on OK or the
    /// original on cancel.
    pub fn close_picker(&mut self, accept: bool) -> Option<LinearColor> {
        let picker = self.picker.take()?;
        debug!(session = picker.id(), accept, "closing color picker");
        Some(if accept { picker.commit() } else { picker.cancel() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfig;

    fn session(color: LinearColor, use_alpha: bool) -> ColorPickerSession {
        let mut ctx = PickerContext::new(MemoryConfig::new());
        ctx.open_picker(ColorPickerArgs { initial: color, use_alpha });
        ctx.picker().cloned().unwrap()
    }

    #[test]
    fn unused_alpha_commits_opaque() {
        let s = session(LinearColor::new(0.2, 0.4, 0.6, 0.3), false);
        assert_eq!(s.commit().a, 1.0);
        let s = session(LinearColor::new(0.2, 0.4, 0.6, 0.3), true);
        assert!((s.commit().a - 0.3).abs() < 1e-12);
    }

    #[test]
    fn hue_survives_desaturation() {
        let mut s = session(LinearColor::new(0.0, 0.0, 1.0, 1.0), true);
        s.set_channel(ColorChannel::Saturation, 0.0);
        s.set_color(s.color());
        assert_eq!(s.hsv().h, 240.0);
        s.set_channel(ColorChannel::Saturation, 1.0);
        let c = s.color();
        assert!(c.equals_within(&LinearColor::new(0.0, 0.0, 1.0, 1.0), 1e-12));
    }

    #[test]
    fn rgb_channels_go_through_hsv() {
        let mut s = session(LinearColor::BLACK, true);
        s.set_channel(ColorChannel::Red, 1.0);
        assert_eq!(s.hsv(), Hsv::new(0.0, 1.0, 1.0, 1.0));
        s.set_channel(ColorChannel::Green, 1.0);
        assert!((s.hsv().h - 60.0).abs() < 1e-12);
        assert!((s.channel(ColorChannel::Green) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hex_text_follows_alpha_and_srgb() {
        let mut s = session(LinearColor::new(0.2158605, 0.0, 0.0, 1.0), false);
        assert_eq!(s.hex_text(), "800000");
        s.set_srgb(false);
        assert_eq!(s.hex_text(), "370000");
    }

    #[test]
    fn malformed_hex_is_ignored() {
        let mut s = session(LinearColor::new(0.5, 0.5, 0.5, 1.0), true);
        let before = s.hsv();
        assert!(!s.apply_hex_text("12G456"));
        assert!(!s.apply_hex_text(""));
        assert!(!s.apply_hex_text("123456789"));
        assert_eq!(s.hsv(), before);
        assert!(s.apply_hex_text("#00FF00"));
        assert!(s.color().equals_within(&LinearColor::new(0.0, 1.0, 0.0, 1.0), 1e-12));
    }

    #[test]
    fn opening_a_picker_replaces_the_previous_one() {
        let mut ctx = PickerContext::new(MemoryConfig::new());
        assert!(ctx.open_picker(ColorPickerArgs::new(LinearColor::WHITE)).is_none());
        let first = ctx.picker().unwrap().id();
        let replaced = ctx.open_picker(ColorPickerArgs::new(LinearColor::BLACK)).unwrap();
        assert_eq!(replaced.id(), first);
        assert_ne!(ctx.picker().unwrap().id(), first);
        assert_eq!(ctx.close_picker(false), Some(LinearColor::BLACK));
        assert_eq!(ctx.close_picker(true), None);
    }

    #[test]
    fn settings_persist_and_reach_the_open_picker() {
        let mut ctx = PickerContext::new(MemoryConfig::new());
        ctx.open_picker(ColorPickerArgs::new(LinearColor::WHITE));
        assert!(ctx.picker().unwrap().srgb());
        ctx.update_settings(|s| s.srgb_enabled = false);
        assert!(!ctx.picker().unwrap().srgb());
        let config = ctx.themes().config();
        assert_eq!(config.get_bool("ColorPickerUI", "bSRGBEnabled"), Some(false));
        // themes still intact alongside
        assert_eq!(config.get("ColorThemes", "Theme0").as_deref(), Some("New Theme"));
    }

    #[test]
    fn channel_configs_bound_the_sliders() {
        assert_eq!(ColorChannel::Hue.spin_config().slider_range(), Some((0.0, 360.0)));
        let red = ColorChannel::Red.spin_config();
        assert_eq!(red.slider_range(), Some((0.0, 1.0)));
        assert_eq!(red.max_value, Some(1.0));
        assert!(!red.support_dynamic_slider_max_value);
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        let mut s = session(LinearColor::new(0.5, 0.5, 0.5, 1.0), true);
        s.set_channel(ColorChannel::Value, 3.0);
        assert_eq!(s.hsv().v, 1.0);
        s.set_channel(ColorChannel::Red, 7.0);
        assert!(s.hsv().v <= 1.0);
        assert_eq!(s.channel(ColorChannel::Red), 1.0);
        s.set_color(LinearColor::new(4.0, 2.0, 0.0, 1.0));
        assert!(s.hsv().v <= 1.0);
        s.set_channel(ColorChannel::Blue, -2.0);
        assert!(s.color().b >= 0.0);

        let bright = session(LinearColor::new(2.0, 0.0, 0.0, 1.0), true);
        assert_eq!(bright.hsv(), Hsv::new(0.0, 1.0, 1.0, 1.0));
    }
}
