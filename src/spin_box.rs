//! Spin box drag and commit state machine.
//!
//! A spin box is a numeric field that doubles as a slider: press and drag
//! horizontally to scrub the value, or click without dragging to type it.
//! The widget feeds pointer and keyboard input in; every call returns the
//! [`SpinBoxEvent`]s the owner should react to.

use tracing::{debug, trace};

use crate::slider::{self, SliderNumeric};

/// Pointer travel, in pixels, that turns a press into a slide.
pub const DRAG_TRIGGER_DISTANCE: f64 = 5.0;

/// Narrow widgets still map drags as if they were this wide.
pub const MIN_SLIDER_WIDTH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// A visible slider bound and who owns it.
///
/// An external bound belongs to the caller: dynamic extension only reports
/// the new value and leaves the local copy alone until the owner sets it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBound<T> {
    pub value: T,
    pub external: bool,
}

impl<T> SliderBound<T> {
    pub fn owned(value: T) -> Self {
        Self { value, external: false }
    }

    pub fn external(value: T) -> Self {
        Self { value, external: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMethod {
    /// Pointer released or focus lost at the end of a slide.
    Drag,
    /// Text typed into the field.
    Text,
    /// Keyboard increment/decrement.
    Step,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinBoxEvent<T> {
    BeginSliderMovement,
    ValueChanged(T),
    EndSliderMovement(T),
    ValueCommitted(T, CommitMethod),
    /// The press never became a slide; the field should switch to text entry.
    EnterTextMode,
    SliderBoundChanged { side: BoundSide, value: T, external: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinBoxConfig<T> {
    /// Hard bounds of the value. `None` means the type's representable range.
    pub min_value: Option<T>,
    pub max_value: Option<T>,
    /// Visible slider range, may be narrower than the hard bounds.
    pub min_slider_value: Option<SliderBound<T>>,
    pub max_slider_value: Option<SliderBound<T>>,
    /// Snap step. Zero disables snapping.
    pub delta: T,
    pub slider_exponent: f64,
    /// Value the exponential mapping is centered on.
    pub slider_exponent_neutral_value: Option<T>,
    pub shift_multiplier: f64,
    pub ctrl_multiplier: f64,
    pub support_dynamic_slider_max_value: bool,
    pub support_dynamic_slider_min_value: bool,
}

impl<T: SliderNumeric> SpinBoxConfig<T> {
    pub fn new(delta: T) -> Self {
        Self {
            min_value: None,
            max_value: None,
            min_slider_value: None,
            max_slider_value: None,
            delta,
            slider_exponent: 1.0,
            slider_exponent_neutral_value: None,
            shift_multiplier: 10.0,
            ctrl_multiplier: 0.1,
            support_dynamic_slider_max_value: false,
            support_dynamic_slider_min_value: false,
        }
    }

    /// Hard value range with the slider spanning all of it.
    pub fn with_range(mut self, min: T, max: T) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }

    pub fn with_slider_range(mut self, min: SliderBound<T>, max: SliderBound<T>) -> Self {
        self.min_slider_value = Some(min);
        self.max_slider_value = Some(max);
        self
    }

    pub fn with_exponent(mut self, exponent: f64, neutral: Option<T>) -> Self {
        self.slider_exponent = exponent;
        self.slider_exponent_neutral_value = neutral;
        self
    }

    fn value_bounds(&self) -> (f64, f64) {
        (
            self.min_value.unwrap_or(T::LOWEST).to_f64(),
            self.max_value.unwrap_or(T::HIGHEST).to_f64(),
        )
    }

    fn slider_min(&self) -> Option<f64> {
        self.min_slider_value
            .map(|b| b.value)
            .or(self.min_value)
            .map(T::to_f64)
    }

    fn slider_max(&self) -> Option<f64> {
        self.max_slider_value
            .map(|b| b.value)
            .or(self.max_value)
            .map(T::to_f64)
    }

    /// Finite visible range, if both ends are known.
    pub fn slider_range(&self) -> Option<(f64, f64)> {
        match (self.slider_min(), self.slider_max()) {
            (Some(lo), Some(hi)) if lo < hi && lo.is_finite() && hi.is_finite() => Some((lo, hi)),
            _ => None,
        }
    }

    /// Per-pixel step used when there is no finite slider range.
    fn unbounded_step(&self) -> f64 {
        let delta = self.delta.to_f64();
        if delta != 0.0 {
            delta
        } else if T::INTEGRAL {
            1.0
        } else {
            0.01
        }
    }

    fn multiplier(&self, modifiers: Modifiers) -> f64 {
        if modifiers.shift {
            self.shift_multiplier
        } else if modifiers.ctrl {
            self.ctrl_multiplier
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Pointer is down, accumulated travel not yet past the trigger.
    Pressed { distance: f64 },
    Sliding,
}

#[derive(Debug, Clone)]
pub struct SpinBox<T: SliderNumeric> {
    config: SpinBoxConfig<T>,
    value: T,
    /// Float accumulator so integral or snapped values keep sub-step drags.
    internal_value: f64,
    pre_drag_value: T,
    gesture: Gesture,
    text_editing: bool,
}

impl<T: SliderNumeric> SpinBox<T> {
    pub fn new(value: T, config: SpinBoxConfig<T>) -> Self {
        let mut spin = Self {
            config,
            value,
            internal_value: value.to_f64(),
            pre_drag_value: value,
            gesture: Gesture::Idle,
            text_editing: false,
        };
        spin.set_value(value);
        spin
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn internal_value(&self) -> f64 {
        self.internal_value
    }

    pub fn config(&self) -> &SpinBoxConfig<T> {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture == Gesture::Sliding
    }

    pub fn is_text_editing(&self) -> bool {
        self.text_editing
    }

    /// External value update. Clamped to the hard bounds, not snapped.
    pub fn set_value(&mut self, value: T) {
        let (lo, hi) = self.config.value_bounds();
        let v = value.to_f64().clamp(lo, hi);
        self.internal_value = v;
        self.value = T::from_f64(v);
    }

    /// Owner-side update of a slider bound, typically after reacting to
    /// [`SpinBoxEvent::SliderBoundChanged`] for an external bound.
    pub fn set_slider_bound(&mut self, side: BoundSide, value: T) {
        let slot = match side {
            BoundSide::Min => &mut self.config.min_slider_value,
            BoundSide::Max => &mut self.config.max_slider_value,
        };
        slot.get_or_insert(SliderBound::owned(value)).value = value;
    }

    /// Thumb position in 0.0–1.0 for painting, with the exponent applied.
    pub fn slider_fraction(&self) -> Option<f64> {
        let (lo, hi) = self.config.slider_range()?;
        let linear = slider::fraction(self.internal_value, lo, hi);
        Some(slider::compute_exponent_slider_fraction(
            linear,
            self.neutral_fraction(lo, hi),
            1.0 / self.config.slider_exponent,
        ))
    }

    pub fn pointer_down(&mut self) -> Vec<SpinBoxEvent<T>> {
        self.gesture = Gesture::Pressed { distance: 0.0 };
        self.pre_drag_value = self.value;
        self.internal_value = self.value.to_f64();
        Vec::new()
    }

    /// Horizontal pointer travel since the last call, in pixels.
    pub fn pointer_move(
        &mut self,
        delta_x: f64,
        width: f64,
        modifiers: Modifiers,
    ) -> Vec<SpinBoxEvent<T>> {
        match self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Pressed { distance } => {
                let distance = distance + delta_x.abs();
                if distance > DRAG_TRIGGER_DISTANCE {
                    debug!(value = ?self.value, "spin box slide started");
                    self.gesture = Gesture::Sliding;
                    self.text_editing = false;
                    vec![SpinBoxEvent::BeginSliderMovement]
                } else {
                    self.gesture = Gesture::Pressed { distance };
                    Vec::new()
                }
            }
            Gesture::Sliding => self.slide(delta_x, width, modifiers),
        }
    }

    pub fn pointer_up(&mut self) -> Vec<SpinBoxEvent<T>> {
        match self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Pressed { .. } => {
                self.gesture = Gesture::Idle;
                self.text_editing = true;
                vec![SpinBoxEvent::EnterTextMode]
            }
            Gesture::Sliding => self.finish_slide(),
        }
    }

    /// Focus loss ends a slide like a release, but never opens text entry.
    pub fn focus_lost(&mut self) -> Vec<SpinBoxEvent<T>> {
        match self.gesture {
            Gesture::Sliding => self.finish_slide(),
            _ => {
                self.gesture = Gesture::Idle;
                Vec::new()
            }
        }
    }

    /// Escape: abandon the gesture and restore the value from before it.
    pub fn cancel(&mut self) -> Vec<SpinBoxEvent<T>> {
        let was_sliding = self.gesture == Gesture::Sliding;
        self.gesture = Gesture::Idle;
        self.text_editing = false;
        if !was_sliding {
            return Vec::new();
        }
        debug!(restored = ?self.pre_drag_value, "spin box slide cancelled");
        let mut events = Vec::new();
        let restored = self.pre_drag_value;
        if self.value != restored {
            events.push(SpinBoxEvent::ValueChanged(restored));
        }
        self.value = restored;
        self.internal_value = restored.to_f64();
        events.push(SpinBoxEvent::EndSliderMovement(restored));
        events
    }

    /// Commit typed text. Unparseable text is ignored and the prior value
    /// stays.
    pub fn commit_text(&mut self, text: &str) -> Vec<SpinBoxEvent<T>> {
        self.text_editing = false;
        let Some(parsed) = T::parse_text(text) else {
            trace!(text, "ignoring non-numeric spin box text");
            return Vec::new();
        };
        let mut events = Vec::new();
        self.apply(parsed.to_f64(), &mut events);
        events.push(SpinBoxEvent::ValueCommitted(self.value, CommitMethod::Text));
        events
    }

    /// Keyboard increment (`up`) or decrement by one delta.
    pub fn step(&mut self, up: bool, modifiers: Modifiers) -> Vec<SpinBoxEvent<T>> {
        let step = self.config.unbounded_step() * self.config.multiplier(modifiers);
        let target = self.value.to_f64() + if up { step } else { -step };
        let mut events = Vec::new();
        self.apply(target, &mut events);
        events.push(SpinBoxEvent::ValueCommitted(self.value, CommitMethod::Step));
        events
    }

    fn neutral_fraction(&self, lo: f64, hi: f64) -> f64 {
        match self.config.slider_exponent_neutral_value {
            Some(n) => slider::fraction(n.to_f64(), lo, hi),
            None => 0.0,
        }
    }

    fn slide(&mut self, delta_x: f64, width: f64, modifiers: Modifiers) -> Vec<SpinBoxEvent<T>> {
        let mut events = Vec::new();
        let width = width.max(MIN_SLIDER_WIDTH);
        let multiplier = self.config.multiplier(modifiers);

        let Some((lo, hi)) = self.config.slider_range() else {
            let target = self.internal_value + delta_x * self.config.unbounded_step() * multiplier;
            self.apply(target, &mut events);
            return events;
        };

        if modifiers.alt && self.extend_bound(delta_x, width, lo, hi, multiplier, &mut events) {
            return events;
        }

        let neutral = self.neutral_fraction(lo, hi);
        let exponent = self.config.slider_exponent;
        let linear = slider::fraction(self.internal_value, lo, hi);
        let thumb = slider::compute_exponent_slider_fraction(linear, neutral, 1.0 / exponent);
        let thumb = (thumb + delta_x / width * multiplier).clamp(0.0, 1.0);
        let linear = slider::compute_exponent_slider_fraction(thumb, neutral, exponent);
        trace!(thumb, linear, "spin box slide");
        self.apply(slider::lerp(lo, hi, linear), &mut events);
        events
    }

    /// Push the slider bound outward when scrubbing against it. Returns
    /// whether the drag was consumed.
    fn extend_bound(
        &mut self,
        delta_x: f64,
        width: f64,
        lo: f64,
        hi: f64,
        multiplier: f64,
        events: &mut Vec<SpinBoxEvent<T>>,
    ) -> bool {
        let value_delta = delta_x / width * (hi - lo) * multiplier;
        let (side, current, bound) = if self.config.support_dynamic_slider_max_value
            && value_delta > 0.0
            && self.internal_value >= hi
        {
            (BoundSide::Max, hi, self.config.max_slider_value)
        } else if self.config.support_dynamic_slider_min_value
            && value_delta < 0.0
            && self.internal_value <= lo
        {
            (BoundSide::Min, lo, self.config.min_slider_value)
        } else {
            return false;
        };

        let (vlo, vhi) = self.config.value_bounds();
        let extended = (current + value_delta).clamp(vlo, vhi);
        if extended == current {
            return false;
        }
        let extended_t = T::from_f64(extended);
        let external = bound.is_some_and(|b| b.external);
        debug!(?side, new_bound = extended, external, "extending slider bound");
        events.push(SpinBoxEvent::SliderBoundChanged {
            side,
            value: extended_t,
            external,
        });
        if !external {
            self.set_slider_bound(side, extended_t);
            self.apply(extended, events);
        }
        true
    }

    fn finish_slide(&mut self) -> Vec<SpinBoxEvent<T>> {
        self.gesture = Gesture::Idle;
        debug!(value = ?self.value, "spin box slide committed");
        vec![
            SpinBoxEvent::EndSliderMovement(self.value),
            SpinBoxEvent::ValueCommitted(self.value, CommitMethod::Drag),
        ]
    }

    /// Store `target` in the accumulator and publish the snapped value.
    fn apply(&mut self, target: f64, events: &mut Vec<SpinBoxEvent<T>>) {
        let (lo, hi) = self.config.value_bounds();
        self.internal_value = target.clamp(lo, hi);
        let snapped = slider::snap(self.internal_value, self.config.delta.to_f64(), lo, hi);
        let next = T::from_f64(snapped);
        if next != self.value {
            self.value = next;
            events.push(SpinBoxEvent::ValueChanged(next));
        }
    }
}
