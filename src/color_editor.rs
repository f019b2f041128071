//! Color editor panel: channel spin sliders, hex entry, optional wheel, the
//! swatch strip and the theme controls, all driving one [`PickerContext`].

use std::cell::RefCell;
use std::rc::Rc;

use floem::prelude::*;
use floem::reactive::{RwSignal, SignalGet, SignalUpdate, create_memo};
use lucide_icons::Icon;
use tracing::debug;

use crate::color::{Hsv, LinearColor};
use crate::color_wheel::color_wheel;
use crate::config::{ConfigStore, PickerSettings};
use crate::constants;
use crate::inputs::{copy_button, hex_input, icon_button, name_input, toggle};
use crate::picker::{ColorChannel, ColorPickerSession, PickerContext};
use crate::spin_box::SpinBoxEvent;
use crate::spin_slider::spin_slider_row;
use crate::swatch_strip::swatch_strip;
use crate::theme::ThemeError;

/// Shared handle the panel's closures edit through. Every edit bumps the
/// signals the views track, after the context borrow is released.
struct Editor<C: ConfigStore + 'static> {
    ctx: Rc<RefCell<PickerContext<C>>>,
    hsv: RwSignal<Hsv>,
    settings: RwSignal<PickerSettings>,
    revision: RwSignal<u64>,
}

impl<C: ConfigStore + 'static> Clone for Editor<C> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            hsv: self.hsv,
            settings: self.settings,
            revision: self.revision,
        }
    }
}

impl<C: ConfigStore + 'static> Editor<C> {
    fn edit(&self, f: impl FnOnce(&mut ColorPickerSession)) {
        let hsv = {
            let mut ctx = self.ctx.borrow_mut();
            let Some(picker) = ctx.picker_mut() else {
                return;
            };
            f(picker);
            picker.hsv()
        };
        if self.hsv.get_untracked() != hsv {
            self.hsv.set(hsv);
            self.revision.update(|r| *r += 1);
        }
    }

    fn update_settings(&self, f: impl FnOnce(&mut PickerSettings)) {
        let settings = {
            let mut ctx = self.ctx.borrow_mut();
            ctx.update_settings(f);
            ctx.settings()
        };
        self.settings.set(settings);
        self.revision.update(|r| *r += 1);
    }

    /// Run a theme store operation and report its error, if any, as text.
    fn themes<T>(
        &self,
        f: impl FnOnce(&mut crate::theme::ColorThemeStore<C>) -> Result<T, ThemeError>,
    ) -> Option<String> {
        let result = f(self.ctx.borrow_mut().themes_mut());
        self.revision.update(|r| *r += 1);
        match result {
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "theme edit rejected");
                Some(e.to_string())
            }
        }
    }

    /// Error text for renaming the current theme to `name`, if any.
    fn validate_name(&self, name: &str) -> Option<String> {
        let ctx = self.ctx.borrow();
        let store = ctx.themes();
        store
            .validate_theme_name(store.current_theme().id(), name)
            .err()
            .map(|e| e.to_string())
    }

    fn current_theme_name(&self) -> String {
        self.ctx.borrow().themes().current_theme().name().to_string()
    }

    /// Select the theme `offset` places from the current one, wrapping.
    fn cycle_theme(&self, offset: isize) {
        self.themes(|store| {
            let themes = store.themes();
            let current = store.current_theme().id();
            let pos = themes.iter().position(|t| t.id() == current).unwrap_or(0);
            let next = (pos as isize + offset).rem_euclid(themes.len() as isize) as usize;
            let id = themes[next].id();
            store.set_current_theme(id)
        });
    }
}

fn channel_rows<C: ConfigStore + 'static>(
    editor: &Editor<C>,
    channels: &[ColorChannel],
) -> impl IntoView + use<C> {
    let hsv = editor.hsv;
    let rows: Vec<_> = channels
        .iter()
        .map(|&channel| {
            let editor = editor.clone();
            spin_slider_row(
                channel.label(),
                channel.spin_config(),
                move || channel.value_of(hsv.get()),
                move |event| match event {
                    SpinBoxEvent::ValueChanged(v)
                    | SpinBoxEvent::EndSliderMovement(v)
                    | SpinBoxEvent::ValueCommitted(v, _) => {
                        editor.edit(|p| p.set_channel(channel, v));
                    }
                    _ => {}
                },
            )
        })
        .collect();
    v_stack_from_iter(rows).style(|s| s.gap(constants::GAP / 2.0))
}

fn theme_controls<C: ConfigStore + 'static>(editor: &Editor<C>) -> impl IntoView + use<C> {
    let name = RwSignal::new(editor.current_theme_name());
    let revision = editor.revision;
    {
        let editor = editor.clone();
        floem::reactive::create_effect(move |_| {
            revision.get();
            let current = editor.current_theme_name();
            if name.get_untracked() != current {
                name.set(current);
            }
        });
    }

    let prev = editor.clone();
    let next = editor.clone();
    let create = editor.clone();
    let duplicate = editor.clone();
    let delete = editor.clone();
    let rename = editor.clone();
    let check = editor.clone();

    v_stack((
        h_stack((
            icon_button(Icon::ChevronLeft, move || prev.cycle_theme(-1)),
            name_input(
                name,
                move |text| check.validate_name(text),
                move |text| {
                    rename.themes(|store| {
                    let id = store.current_theme().id();
                        store.rename_theme(id, text)
                    })
                },
            ),
            icon_button(Icon::ChevronRight, move || next.cycle_theme(1)),
        ))
        .style(|s| s.items_center().gap(constants::GAP / 2.0)),
        h_stack((
            icon_button(Icon::Plus, move || {
                create.themes(|store| {
                    let id = store.create_theme(crate::theme::DEFAULT_THEME_NAME, []);
                    store.set_current_theme(id)
                });
            }),
            icon_button(Icon::CopyPlus, move || {
                duplicate.themes(|store| {
                    let id = store.duplicate_theme(store.current_theme().id())?;
                    store.set_current_theme(id)
                });
            }),
            icon_button(Icon::Trash2, move || {
                delete.themes(|store| store.delete_theme(store.current_theme().id()));
            }),
        ))
        .style(|s| s.gap(constants::GAP / 2.0)),
    ))
    .style(|s| s.gap(constants::GAP / 2.0))
}

/// Creates the color editor for the picker open in `ctx`.
pub(crate) fn color_editor<C: ConfigStore + 'static>(
    ctx: Rc<RefCell<PickerContext<C>>>,
) -> impl IntoView {
    let (hsv, settings, use_alpha) = {
        let ctx = ctx.borrow();
        let picker = ctx.picker();
        (
            picker.map(|p| p.hsv()).unwrap_or(Hsv::new(0.0, 0.0, 1.0, 1.0)),
            ctx.settings(),
            picker.is_none_or(|p| p.use_alpha()),
        )
    };
    let editor = Editor {
        ctx: ctx.clone(),
        hsv: RwSignal::new(hsv),
        settings: RwSignal::new(settings),
        revision: RwSignal::new(0),
    };
    let hsv = editor.hsv;
    let settings = editor.settings;
    let trash_visible = RwSignal::new(false);

    let hex = {
        let ctx = ctx.clone();
        create_memo(move |_| {
            hsv.get();
            settings.get();
            ctx.borrow().picker().map(|p| p.hex_text()).unwrap_or_default()
        })
    };

    let mut basic = vec![ColorChannel::Red, ColorChannel::Green, ColorChannel::Blue];
    if use_alpha {
        basic.push(ColorChannel::Alpha);
    }
    let advanced = [ColorChannel::Hue, ColorChannel::Saturation, ColorChannel::Value];

    let wheel_editor = editor.clone();
    let hex_editor = editor.clone();
    let pick_editor = editor.clone();
    let wheel_toggle = editor.clone();
    let advanced_toggle = editor.clone();
    let srgb_toggle = editor.clone();

    v_stack((
        dyn_container(
            move || settings.get().wheel_mode,
            move |wheel_mode| {
                if wheel_mode {
                    let editor = wheel_editor.clone();
                    color_wheel(
                        move || hsv.get(),
                        move |h, s| {
                            editor.edit(|p| p.set_hsv(Hsv { h, s, ..p.hsv() }));
                        },
                    )
                    .into_any()
                } else {
                    empty().into_any()
                }
            },
        )
        .style(|s| s.margin_horiz(8.0)),
        swatch_strip(ctx, editor.revision, trash_visible, move |color: LinearColor| {
            pick_editor.edit(|p| p.set_color(color));
        }),
        label(|| "Drop on the red zone to delete").style(move |s| {
            s.font_size(constants::LABEL_FONT)
                .color(Color::rgb8(120, 120, 120))
                .apply_if(!trash_visible.get(), |s| s.hide())
        }),
        h_stack((
            hex_input(
                move || hex.get(),
                move |text: &str| {
                    hex_editor.edit(|p| {
                        p.apply_hex_text(text);
                    })
                },
            ),
            copy_button(move || hex.get()),
        ))
        .style(|s| s.gap(constants::GAP).items_center()),
        channel_rows(&editor, &basic),
        dyn_container(
            move || settings.get().advanced_section_expanded,
            {
                let editor = editor.clone();
                move |expanded| {
                    if expanded {
                        channel_rows(&editor, &advanced).into_any()
                    } else {
                        empty().into_any()
                    }
                }
            },
        ),
        h_stack((
            toggle(
                "Wheel",
                move || settings.get().wheel_mode,
                move || wheel_toggle.update_settings(|s| s.wheel_mode = !s.wheel_mode),
            ),
            toggle(
                "HSV",
                move || settings.get().advanced_section_expanded,
                move || {
                    advanced_toggle.update_settings(|s| {
                        s.advanced_section_expanded = !s.advanced_section_expanded
                    })
                },
            ),
            toggle(
                "sRGB",
                move || settings.get().srgb_enabled,
                move || srgb_toggle.update_settings(|s| s.srgb_enabled = !s.srgb_enabled),
            ),
        ))
        .style(|s| s.gap(constants::GAP / 2.0)),
        theme_controls(&editor),
    ))
    .style(|st| {
        st.gap(constants::GAP)
            .padding(constants::PADDING)
            .size_full()
            .background(Color::rgb8(242, 242, 242))
    })
}
