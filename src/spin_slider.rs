//! Spin slider view: a track the user drags to scrub a [`SpinBox`] value,
//! paired with a text field for typed entry.
//!
//! The view owns the spin box and forwards every [`SpinBoxEvent`] to its
//! owner, which writes the value back through the `value` getter.

use floem::event::EventPropagation;
use floem::keyboard::{Key, Modifiers as KeyModifiers, NamedKey};
use floem::kurbo::{Rect, Stroke};
use floem::peniko::Color;
use floem::prelude::*;
use floem::reactive::{RwSignal, SignalGet, SignalUpdate, create_effect};
use floem::{
    View, ViewId,
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::Event,
};
use floem_renderer::Renderer;
use tracing::trace;

use crate::constants;
use crate::slider::SliderNumeric;
use crate::spin_box::{Modifiers, SpinBox, SpinBoxConfig, SpinBoxEvent};

enum SpinSliderUpdate {
    Value(f64),
    CommitText(String),
}

pub(crate) struct SpinSlider {
    id: ViewId,
    spin: SpinBox<f64>,
    last_x: f64,
    size: floem::taffy::prelude::Size<f32>,
    on_event: Box<dyn Fn(SpinBoxEvent<f64>)>,
}

fn modifiers(m: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: m.contains(KeyModifiers::SHIFT),
        ctrl: m.contains(KeyModifiers::CONTROL),
        alt: m.contains(KeyModifiers::ALT),
    }
}

fn format_value(value: f64) -> String {
    let text = format!("{value:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Creates a spin slider for `config`, tracking `value`.
pub(crate) fn spin_slider(
    config: SpinBoxConfig<f64>,
    value: impl Fn() -> f64 + 'static,
    on_event: impl Fn(SpinBoxEvent<f64>) + 'static,
) -> SpinSlider {
    let id = ViewId::new();
    let initial = value();

    create_effect(move |_| {
        id.update_state(SpinSliderUpdate::Value(value()));
    });

    SpinSlider {
        id,
        spin: SpinBox::new(initial, config),
        last_x: 0.0,
        size: Default::default(),
        on_event: Box::new(on_event),
    }
    .style(|s| {
        s.height(constants::SLIDER_HEIGHT)
            .width(constants::SLIDER_WIDTH)
            .border_radius(constants::RADIUS)
            .cursor(floem::style::CursorStyle::ColResize)
    })
}

impl SpinSlider {
    fn emit(&mut self, events: Vec<SpinBoxEvent<f64>>) {
        if events.is_empty() {
            return;
        }
        for event in events {
            trace!(?event, "spin slider event");
            (self.on_event)(event);
        }
        self.id.request_paint();
    }
}

impl View for SpinSlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<SpinSliderUpdate>() {
            match *update {
                SpinSliderUpdate::Value(v) => {
                    // scrubbing already holds the finer internal value
                    if !self.spin.is_dragging() {
                        self.spin.set_value(v);
                    }
                }
                SpinSliderUpdate::CommitText(text) => {
                    let events = self.spin.commit_text(&text);
                    self.emit(events);
                }
            }
            self.id.request_paint();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.id.request_focus();
                self.last_x = e.pos.x;
                let events = self.spin.pointer_down();
                self.emit(events);
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                let delta_x = e.pos.x - self.last_x;
                self.last_x = e.pos.x;
                let events =
                    self.spin
                        .pointer_move(delta_x, self.size.width as f64, modifiers(e.modifiers));
                let consumed = !events.is_empty() || self.spin.is_dragging();
                self.emit(events);
                if consumed {
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) => {
                let events = self.spin.pointer_up();
                self.emit(events);
                EventPropagation::Continue
            }
            Event::KeyDown(ke) => {
                let mods = modifiers(ke.modifiers);
                let events = match ke.key.logical_key {
                    Key::Named(NamedKey::Escape) => self.spin.cancel(),
                    Key::Named(NamedKey::ArrowUp | NamedKey::ArrowRight) => {
                        self.spin.step(true, mods)
                    }
                    Key::Named(NamedKey::ArrowDown | NamedKey::ArrowLeft) => {
                        self.spin.step(false, mods)
                    }
                    _ => return EventPropagation::Continue,
                };
                self.emit(events);
                EventPropagation::Stop
            }
            Event::FocusLost => {
                let events = self.spin.focus_lost();
                self.emit(events);
                EventPropagation::Continue
            }
            _ => EventPropagation::Continue,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        if w == 0.0 || h == 0.0 {
            return;
        }
        let rect = Rect::new(0.0, 0.0, w, h);
        let rrect = rect.to_rounded_rect(constants::RADIUS as f64);
        cx.fill(&rrect, Color::WHITE, 0.0);

        if let Some(fraction) = self.spin.slider_fraction() {
            cx.save();
            cx.clip(&rrect);
            let fill = Rect::new(0.0, 0.0, w * fraction, h);
            let color = if self.spin.is_dragging() {
                Color::rgb8(120, 160, 230)
            } else {
                Color::rgb8(170, 195, 240)
            };
            cx.fill(&fill, color, 0.0);
            cx.restore();
        }

        cx.stroke(&rrect, Color::rgb8(200, 200, 200), &Stroke::new(1.0));
    }
}

/// A labeled spin slider row with its text field.
///
/// A click on the track focuses the text field. Enter or focus loss commits
/// the typed text through the spin box.
pub(crate) fn spin_slider_row(
    lbl: &'static str,
    config: SpinBoxConfig<f64>,
    value: impl Fn() -> f64 + Copy + 'static,
    on_event: impl Fn(SpinBoxEvent<f64>) + 'static,
) -> impl IntoView {
    let text = RwSignal::new(format_value(value()));

    create_effect(move |_| {
        let formatted = format_value(value());
        if text.get_untracked() != formatted {
            text.set(formatted);
        }
    });

    let input = text_input(text);
    let input_id = input.id();

    let slider = spin_slider(config, value, move |event| {
        if matches!(event, SpinBoxEvent::EnterTextMode) {
            input_id.request_focus();
        }
        on_event(event);
    });
    let slider_id = slider.id();

    let on_commit = move || {
        let raw = text.get_untracked();
        if f64::parse_text(&raw).is_none() {
            text.set(format_value(value()));
        }
        slider_id.update_state(SpinSliderUpdate::CommitText(raw));
    };

    h_stack((
        label(move || lbl).style(|s| {
            s.width(constants::LABEL_WIDTH)
                .font_size(constants::LABEL_FONT)
                .color(Color::rgb8(120, 120, 120))
        }),
        slider,
        input
            .style(|s| {
                s.width(constants::INPUT_WIDTH)
                    .padding(2.0)
                    .font_size(constants::INPUT_FONT)
                    .font_family("monospace".to_string())
                    .background(Color::WHITE)
                    .border(1.0)
                    .border_color(Color::rgb8(200, 200, 200))
                    .border_radius(3.0)
            })
            .on_event_stop(floem::event::EventListener::FocusLost, move |_| {
                on_commit();
            })
            .on_event(floem::event::EventListener::KeyDown, move |e| {
                if let Event::KeyDown(ke) = e
                    && ke.key.logical_key == Key::Named(NamedKey::Enter)
                {
                    on_commit();
                    return EventPropagation::Stop;
                }
                EventPropagation::Continue
            }),
    ))
    .style(|s| s.items_center().gap(constants::GAP / 2.0))
}
