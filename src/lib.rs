//! # floem-swatches
//!
//! Color picking building blocks: HSV and linear RGB colors with sRGB aware
//! hex text, an exponential spin slider model, persisted named color themes
//! and the drag and drop rules for moving colors between them.
//!
//! The core is headless. Enable the `widgets` feature for a
//! [Floem](https://github.com/lapce/floem) picker panel built on it.
//!
//! ## Usage
//!
//! ```rust
//! use floem_swatches::{ColorPickerArgs, LinearColor, MemoryConfig, PickerContext};
//!
//! let mut ctx = PickerContext::new(MemoryConfig::new());
//! ctx.open_picker(ColorPickerArgs::new(LinearColor::new(1.0, 0.0, 0.0, 1.0)));
//!
//! let picker = ctx.picker_mut().unwrap();
//! assert_eq!(picker.hex_text(), "FF0000FF");
//! picker.apply_hex_text("00FF00");
//!
//! let theme = ctx.themes().current_theme().id();
//! let green = ctx.close_picker(true).unwrap();
//! ctx.themes_mut().insert_color(theme, green, 0).unwrap();
//! ```

mod color;
mod config;
mod drag;
mod math;
mod picker;
mod slider;
mod spin_box;
mod theme;

#[cfg(feature = "widgets")]
mod checkerboard;
#[cfg(feature = "widgets")]
mod color_editor;
#[cfg(feature = "widgets")]
mod color_wheel;
#[cfg(feature = "widgets")]
mod constants;
#[cfg(feature = "widgets")]
mod inputs;
#[cfg(feature = "widgets")]
mod spin_slider;
#[cfg(feature = "widgets")]
mod swatch_strip;

pub use color::{Hsv, LinearColor, ParseColorError, Rgba8};
pub use config::{ConfigError, ConfigStore, FileConfig, MemoryConfig, PickerSettings};
pub use drag::{
    ColorDrag, ColorDragPayload, DragSource, DropOutcome, DropTarget, SlotOrigin,
    insertion_index,
};
pub use picker::{ColorChannel, ColorPickerArgs, ColorPickerSession, PickerContext};
pub use slider::{SliderNumeric, compute_exponent_slider_fraction, fraction, lerp, snap};
pub use spin_box::{
    BoundSide, CommitMethod, DRAG_TRIGGER_DISTANCE, MIN_SLIDER_WIDTH, Modifiers, SliderBound,
    SpinBox, SpinBoxConfig, SpinBoxEvent,
};
pub use theme::{
    ColorTheme, ColorThemeStore, DEFAULT_THEME_NAME, LOAD_TOLERANCE, Swatch, SwatchId,
    ThemeError, ThemeId,
};

#[cfg(feature = "widgets")]
pub use widgets::color_picker;

#[cfg(feature = "widgets")]
mod widgets {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Once;

    use floem::prelude::*;
    use floem::text::FONT_SYSTEM;

    use crate::config::ConfigStore;
    use crate::picker::PickerContext;

    static LOAD_LUCIDE_FONT: Once = Once::new();

    /// Creates the color picker panel for the picker open in `ctx`.
    ///
    /// Edits go straight into the open session and theme changes are saved
    /// through the context's config store. Open the picker before building
    /// the view.
    pub fn color_picker<C: ConfigStore + 'static>(
        ctx: Rc<RefCell<PickerContext<C>>>,
    ) -> impl IntoView {
        LOAD_LUCIDE_FONT.call_once(|| {
            FONT_SYSTEM
                .lock()
                .db_mut()
                .load_font_data(lucide_icons::LUCIDE_FONT_BYTES.to_vec());
        });
        crate::color_editor::color_editor(ctx)
    }
}
