//! Text and button inputs for the picker panel.

use std::rc::Rc;

use floem::event::EventPropagation;
use floem::prelude::*;
use floem::reactive::{RwSignal, SignalGet, SignalUpdate, SignalWith, create_effect};

use crate::constants;

fn field_style(s: floem::style::Style, width: f32) -> floem::style::Style {
    s.width(width)
        .padding(2.0)
        .font_size(constants::INPUT_FONT)
        .font_family("monospace".to_string())
        .background(Color::WHITE)
        .border(1.0)
        .border_color(Color::rgb8(200, 200, 200))
        .border_radius(3.0)
}

fn is_enter(e: &floem::event::Event) -> bool {
    matches!(e, floem::event::Event::KeyDown(ke)
        if ke.key.logical_key == floem::keyboard::Key::Named(floem::keyboard::NamedKey::Enter))
}

/// Hex field for the picked color.
///
/// `hex` is the formatted color. Complete 6 or 8 digit text is applied as
/// the user types; Enter or focus loss applies whatever was typed and then
/// shows the formatted color again.
pub(crate) fn hex_input(
    hex: impl Fn() -> String + Copy + 'static,
    apply: impl Fn(&str) + 'static,
) -> impl IntoView {
    let text = RwSignal::new(hex());
    let apply = Rc::new(apply);

    create_effect(move |_| {
        let val = hex();
        let current = text.get_untracked();
        let typed = current.trim().trim_start_matches('#').to_uppercase();
        // typed RRGGBB into an RRGGBBAA field is still in sync
        if typed.is_empty() || !val.starts_with(&typed) {
            text.set(val);
        }
    });

    let apply_typed = apply.clone();
    create_effect(move |_| {
        let raw = text.get();
        let digits = raw.trim().trim_start_matches('#');
        if (digits.len() == 6 || digits.len() == 8)
            && digits.chars().all(|c| c.is_ascii_hexdigit())
            && !hex().starts_with(&digits.to_uppercase())
        {
            apply_typed(digits);
        }
    });

    let on_commit = Rc::new(move || {
        apply(&text.get_untracked());
        let formatted = hex();
        if text.get_untracked() != formatted {
            text.set(formatted);
        }
    });
    let on_enter = on_commit.clone();

    h_stack((
        label(|| "#").style(|s| {
            s.font_size(constants::INPUT_FONT)
                .font_family("monospace".to_string())
                .color(Color::rgb8(120, 120, 120))
        }),
        text_input(text)
            .style(|s| field_style(s, constants::HEX_INPUT_WIDTH))
            .on_event_stop(floem::event::EventListener::FocusLost, move |_| {
                on_commit();
            })
            .on_event(floem::event::EventListener::KeyDown, move |e| {
                if is_enter(e) {
                    on_enter();
                    return EventPropagation::Stop;
                }
                EventPropagation::Continue
            }),
    ))
    .style(|s| s.items_center().gap(1.0))
}

/// Free text field committed on Enter. `validate` runs on every edit and
/// `commit` on Enter; both return an error message to show under the
/// field, or `None` when the text is acceptable.
pub(crate) fn name_input(
    text: RwSignal<String>,
    validate: impl Fn(&str) -> Option<String> + 'static,
    commit: impl Fn(&str) -> Option<String> + 'static,
) -> impl IntoView {
    let error = RwSignal::new(None::<String>);
    create_effect(move |_| {
        let message = text.with(|t| validate(t));
        if error.get_untracked() != message {
            error.set(message);
        }
    });

    v_stack((
        text_input(text)
            .style(|s| field_style(s, 120.0))
            .on_event(floem::event::EventListener::KeyDown, move |e| {
                if is_enter(e) {
                    error.set(commit(&text.get_untracked()));
                    return EventPropagation::Stop;
                }
                EventPropagation::Continue
            }),
        label(move || error.get().unwrap_or_default()).style(move |s| {
            s.font_size(constants::LABEL_FONT)
                .color(Color::rgb8(200, 60, 60))
                .apply_if(error.get().is_none(), |s| s.hide())
        }),
    ))
    .style(|s| s.gap(1.0))
}

/// A small lucide icon button running `on_click` on release.
pub(crate) fn icon_button(
    icon: lucide_icons::Icon,
    on_click: impl Fn() + 'static,
) -> impl IntoView {
    let pressed = RwSignal::new(false);
    container(
        label(move || icon.unicode().to_string()).style(move |s| {
            let c = if pressed.get() {
                Color::rgb8(80, 80, 80)
            } else {
                Color::rgb8(120, 120, 120)
            };
            s.font_size(14.0).font_family("lucide".to_string()).color(c)
        }),
    )
    .style(|s| {
        s.size(20.0, 20.0)
            .items_center()
            .justify_center()
            .border_radius(3.0)
            .cursor(floem::style::CursorStyle::Pointer)
            .hover(|s| s.background(Color::rgb8(230, 230, 230)))
    })
    .on_event_stop(floem::event::EventListener::PointerDown, move |_| {
        pressed.set(true);
    })
    .on_event_stop(floem::event::EventListener::PointerUp, move |_| {
        pressed.set(false);
        on_click();
    })
}

/// Copies the result of `get_text` to the clipboard.
pub(crate) fn copy_button(get_text: impl Fn() -> String + 'static) -> impl IntoView {
    icon_button(lucide_icons::Icon::Copy, move || {
        copy_to_clipboard(&get_text());
    })
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text) {
                tracing::warn!(error = %e, "failed to copy to clipboard");
            }
        }
        Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
    }
}

/// Text toggle for a persisted boolean setting.
pub(crate) fn toggle(
    lbl: &'static str,
    value: impl Fn() -> bool + 'static,
    on_toggle: impl Fn() + 'static,
) -> impl IntoView {
    label(move || lbl)
        .style(move |s| {
            let on = value();
            s.font_size(constants::LABEL_FONT)
                .padding_horiz(4.0)
                .padding_vert(2.0)
                .border(1.0)
                .border_radius(3.0)
                .cursor(floem::style::CursorStyle::Pointer)
                .border_color(Color::rgb8(200, 200, 200))
                .apply_if(on, |s| {
                    s.background(Color::rgb8(170, 195, 240))
                        .border_color(Color::rgb8(120, 160, 230))
                })
        })
        .on_event_stop(floem::event::EventListener::PointerUp, move |_| {
            on_toggle();
        })
}
