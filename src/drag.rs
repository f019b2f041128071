//! Dragging colors between theme bars, swatches and the trash.
//!
//! Drags out of a theme bar are moves: the color leaves its theme as soon as
//! the drag starts, and is put back at its old slot if the drop is rejected
//! or cancelled. Drags from a free swatch (the picker preview, for example)
//! are copies with nothing to put back.
//!
//! ```text
//! Idle --press--> Pressed --motion past trigger--> Dragging
//!   ^                |                                 |
//!   +----release-----+        drop on bar: insert       |
//!   +------------------------ drop on trash: discard ---+
//!                             rejected/cancel: return
//! ```

use tracing::{debug, trace};

use crate::color::{Hsv, LinearColor};
use crate::config::ConfigStore;
use crate::spin_box::DRAG_TRIGGER_DISTANCE;
use crate::theme::{ColorThemeStore, SwatchId, ThemeId};

/// Where a drag-from-theme color came from, and its exact stored value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotOrigin {
    pub theme: ThemeId,
    pub index: usize,
    pub color: LinearColor,
}

/// What travels with the pointer while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorDragPayload {
    pub hsv: Hsv,
    pub origin: Option<SlotOrigin>,
    pub use_alpha: bool,
    pub use_srgb: bool,
}

impl ColorDragPayload {
    pub fn new(hsv: Hsv, use_alpha: bool, use_srgb: bool) -> Self {
        Self {
            hsv,
            origin: None,
            use_alpha,
            use_srgb,
        }
    }

    /// Linear color to insert on drop. Alpha is forced opaque when unused.
    pub fn color(&self) -> LinearColor {
        let color = match self.origin {
            Some(origin) => origin.color,
            None => self.hsv.to_linear(),
        };
        if self.use_alpha { color } else { color.with_alpha(1.0) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSource {
    /// A slot in a theme bar. The color is moved out of the theme.
    ThemeSlot { theme: ThemeId, index: usize },
    /// Any other color element, dragged as a copy.
    Swatch { hsv: Hsv },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropTarget {
    /// A theme bar, with the cursor position relative to its left edge.
    ThemeBar {
        theme: ThemeId,
        local_x: f64,
        slot_width: f64,
    },
    Trash,
    /// Anything that does not accept colors.
    Rejecting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    Inserted {
        theme: ThemeId,
        index: usize,
        swatch: SwatchId,
    },
    Discarded,
    /// Moved back to where the drag started.
    Returned {
        theme: ThemeId,
        index: usize,
        swatch: SwatchId,
    },
}

/// Slot before which a drop at `local_x` would insert, in `0..=len`.
pub fn insertion_index(local_x: f64, slot_width: f64, len: usize) -> usize {
    if slot_width <= 0.0 || local_x.is_nan() || local_x <= 0.0 {
        return 0;
    }
    let slot = (local_x / slot_width).trunc();
    if slot >= len as f64 { len } else { slot as usize }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragPhase {
    Idle,
    Pressed {
        source: DragSource,
        start: (f64, f64),
        use_alpha: bool,
        use_srgb: bool,
    },
    Dragging {
        payload: ColorDragPayload,
        hover: Option<(ThemeId, usize)>,
    },
}

/// One color drag gesture at a time.
pub struct ColorDrag {
    phase: DragPhase,
    on_show_trash: Option<Box<dyn FnMut()>>,
    on_hide_trash: Option<Box<dyn FnMut()>>,
}

impl Default for ColorDrag {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ColorDrag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorDrag").field("phase", &self.phase).finish()
    }
}

impl ColorDrag {
    pub fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
            on_show_trash: None,
            on_hide_trash: None,
        }
    }

    /// Callbacks run when a drag starts and when it resolves, whatever the
    /// outcome.
    pub fn on_trash_visibility(
        mut self,
        show: impl FnMut() + 'static,
        hide: impl FnMut() + 'static,
    ) -> Self {
        self.on_show_trash = Some(Box::new(show));
        self.on_hide_trash = Some(Box::new(hide));
        self
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.phase, DragPhase::Pressed { .. })
    }

    pub fn payload(&self) -> Option<&ColorDragPayload> {
        match &self.phase {
            DragPhase::Dragging { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Theme and slot the payload would land in if dropped now.
    pub fn hover_preview(&self) -> Option<(ThemeId, usize)> {
        match self.phase {
            DragPhase::Dragging { hover, .. } => hover,
            _ => None,
        }
    }

    /// Pointer down on a draggable color. Nothing moves until the pointer
    /// travels past the trigger distance.
    pub fn press(&mut self, source: DragSource, pos: (f64, f64), use_alpha: bool, use_srgb: bool) {
        if self.is_dragging() {
            return;
        }
        self.phase = DragPhase::Pressed {
            source,
            start: pos,
            use_alpha,
            use_srgb,
        };
    }

    /// Pointer up before the drag began: a plain click.
    pub fn release(&mut self) {
        if self.is_pressed() {
            self.phase = DragPhase::Idle;
        }
    }

    /// Track pointer motion while pressed. Returns true when this motion
    /// started the drag.
    pub fn motion<C: ConfigStore>(
        &mut self,
        pos: (f64, f64),
        store: &mut ColorThemeStore<C>,
    ) -> bool {
        let DragPhase::Pressed {
            source,
            start,
            use_alpha,
            use_srgb,
        } = self.phase
        else {
            return false;
        };
        let (dx, dy) = (pos.0 - start.0, pos.1 - start.1);
        if (dx * dx + dy * dy).sqrt() <= DRAG_TRIGGER_DISTANCE {
            return false;
        }

        let payload = match source {
            DragSource::Swatch { hsv } => ColorDragPayload::new(hsv, use_alpha, use_srgb),
            DragSource::ThemeSlot { theme, index } => {
                let Some(swatch) = store.remove_color_at(theme, index) else {
                    debug!(?theme, index, "drag source slot vanished");
                    self.phase = DragPhase::Idle;
                    return false;
                };
                ColorDragPayload {
                    hsv: swatch.color.to_hsv(),
                    origin: Some(SlotOrigin {
                        theme,
                        index,
                        color: swatch.color,
                    }),
                    use_alpha,
                    use_srgb,
                }
            }
        };
        self.begin(payload);
        true
    }

    /// Start dragging `payload` directly. A payload with an origin must
    /// already have been removed from that theme.
    pub fn begin(&mut self, payload: ColorDragPayload) {
        debug!(from_theme = payload.origin.is_some(), "color drag started");
        self.phase = DragPhase::Dragging {
            payload,
            hover: None,
        };
        if let Some(show) = self.on_show_trash.as_mut() {
            show();
        }
    }

    /// Update the insertion preview for the bar under the cursor, or clear
    /// it with `None`.
    pub fn hover<C: ConfigStore>(
        &mut self,
        over: Option<(ThemeId, f64, f64)>,
        store: &ColorThemeStore<C>,
    ) -> Option<usize> {
        let DragPhase::Dragging { hover, .. } = &mut self.phase else {
            return None;
        };
        *hover = over.and_then(|(theme, local_x, slot_width)| {
            let len = store.theme(theme)?.len();
            Some((theme, insertion_index(local_x, slot_width, len)))
        });
        trace!(preview = ?hover, "color drag hover");
        hover.map(|(_, index)| index)
    }

    /// Resolve the drag over `target`. Returns `None` when no drag is in
    /// flight.
    pub fn drop_on<C: ConfigStore>(
        &mut self,
        target: DropTarget,
        store: &mut ColorThemeStore<C>,
    ) -> Option<DropOutcome> {
        let DragPhase::Dragging { payload, .. } = self.phase else {
            self.release();
            return None;
        };
        self.phase = DragPhase::Idle;

        let outcome = match target {
            DropTarget::ThemeBar {
                theme,
                local_x,
                slot_width,
            } => match store.theme(theme).map(|t| t.len()) {
                Some(len) => {
                    let index = insertion_index(local_x, slot_width, len);
                    match store.insert_color(theme, payload.color(), index) {
                        Ok(swatch) => DropOutcome::Inserted {
                            theme,
                            index,
                            swatch,
                        },
                        Err(_) => Self::return_to_origin(&payload, store),
                    }
                }
                None => Self::return_to_origin(&payload, store),
            },
            DropTarget::Trash => DropOutcome::Discarded,
            DropTarget::Rejecting => Self::return_to_origin(&payload, store),
        };
        debug!(?outcome, "color drag resolved");

        if let Some(hide) = self.on_hide_trash.as_mut() {
            hide();
        }
        Some(outcome)
    }

    /// Abandon the drag as if dropped on a rejecting target.
    pub fn cancel<C: ConfigStore>(&mut self, store: &mut ColorThemeStore<C>) -> Option<DropOutcome> {
        self.drop_on(DropTarget::Rejecting, store)
    }

    fn return_to_origin<C: ConfigStore>(
        payload: &ColorDragPayload,
        store: &mut ColorThemeStore<C>,
    ) -> DropOutcome {
        let Some(origin) = payload.origin else {
            return DropOutcome::Discarded;
        };
        let index = match store.theme(origin.theme) {
            Some(theme) => origin.index.min(theme.len()),
            None => return DropOutcome::Discarded,
        };
        match store.insert_color(origin.theme, origin.color, index) {
            Ok(swatch) => DropOutcome::Returned {
                theme: origin.theme,
                index,
                swatch,
            },
            Err(_) => DropOutcome::Discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::config::MemoryConfig;

    const RED: LinearColor = LinearColor::new(1.0, 0.0, 0.0, 1.0);
    const GREEN: LinearColor = LinearColor::new(0.0, 1.0, 0.0, 1.0);
    const BLUE: LinearColor = LinearColor::new(0.0, 0.0, 1.0, 1.0);

    fn store_with(colors: &[LinearColor]) -> (ColorThemeStore<MemoryConfig>, ThemeId) {
        let mut store = ColorThemeStore::load(MemoryConfig::new());
        let theme = store.create_theme("A", colors.iter().copied());
        (store, theme)
    }

    fn start_slot_drag(
        drag: &mut ColorDrag,
        store: &mut ColorThemeStore<MemoryConfig>,
        theme: ThemeId,
        index: usize,
    ) {
        drag.press(DragSource::ThemeSlot { theme, index }, (0.0, 0.0), true, false);
        assert!(!drag.motion((3.0, 0.0), store));
        assert!(drag.motion((10.0, 0.0), store));
    }

    #[test]
    fn insertion_index_truncates_and_clamps() {
        assert_eq!(insertion_index(-5.0, 20.0, 3), 0);
        assert_eq!(insertion_index(19.9, 20.0, 3), 0);
        assert_eq!(insertion_index(20.0, 20.0, 3), 1);
        assert_eq!(insertion_index(59.0, 20.0, 3), 2);
        assert_eq!(insertion_index(500.0, 20.0, 3), 3);
        assert_eq!(insertion_index(10.0, 0.0, 3), 0);
    }

    #[test]
    fn drag_between_themes_moves_the_color() {
        let (mut store, a) = store_with(&[RED, GREEN, BLUE]);
        let b = store.create_theme("B", [GREEN]);
        let mut drag = ColorDrag::new();
        start_slot_drag(&mut drag, &mut store, a, 2);
        assert_eq!(store.theme(a).unwrap().len(), 2);

        assert_eq!(drag.hover(Some((b, 2.0, 20.0)), &store), Some(0));
        let outcome = drag
            .drop_on(
                DropTarget::ThemeBar { theme: b, local_x: 2.0, slot_width: 20.0 },
                &mut store,
            )
            .unwrap();
        assert!(matches!(outcome, DropOutcome::Inserted { theme, index: 0, .. } if theme == b));
        assert_eq!(store.theme(b).unwrap().colors().collect::<Vec<_>>(), vec![BLUE, GREEN]);
        assert_eq!(store.theme(a).unwrap().colors().collect::<Vec<_>>(), vec![RED, GREEN]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn trash_discards() {
        let (mut store, a) = store_with(&[RED, GREEN]);
        let mut drag = ColorDrag::new();
        start_slot_drag(&mut drag, &mut store, a, 0);
        assert_eq!(drag.drop_on(DropTarget::Trash, &mut store), Some(DropOutcome::Discarded));
        assert_eq!(store.theme(a).unwrap().colors().collect::<Vec<_>>(), vec![GREEN]);
    }

    #[test]
    fn rejected_drop_returns_to_origin() {
        let (mut store, a) = store_with(&[RED, GREEN, BLUE]);
        let mut drag = ColorDrag::new();
        start_slot_drag(&mut drag, &mut store, a, 1);
        let outcome = drag.cancel(&mut store).unwrap();
        assert!(matches!(outcome, DropOutcome::Returned { index: 1, .. }));
        assert_eq!(
            store.theme(a).unwrap().colors().collect::<Vec<_>>(),
            vec![RED, GREEN, BLUE]
        );
    }

    #[test]
    fn drop_on_deleted_theme_is_rejected() {
        let (mut store, a) = store_with(&[RED]);
        let b = store.create_theme("B", []);
        let mut drag = ColorDrag::new();
        start_slot_drag(&mut drag, &mut store, a, 0);
        store.delete_theme(b).unwrap();
        let outcome = drag
            .drop_on(
                DropTarget::ThemeBar { theme: b, local_x: 0.0, slot_width: 20.0 },
                &mut store,
            )
            .unwrap();
        assert!(matches!(outcome, DropOutcome::Returned { index: 0, .. }));
        assert_eq!(store.theme(a).unwrap().len(), 1);
    }

    #[test]
    fn swatch_drag_is_a_copy_and_forces_alpha() {
        let (mut store, a) = store_with(&[]);
        let mut drag = ColorDrag::new();
        let translucent = Hsv::new(120.0, 1.0, 1.0, 0.25);
        drag.press(DragSource::Swatch { hsv: translucent }, (0.0, 0.0), false, true);
        assert!(drag.motion((0.0, 8.0), &mut store));
        assert!(drag.payload().unwrap().origin.is_none());
        drag.drop_on(
            DropTarget::ThemeBar { theme: a, local_x: 100.0, slot_width: 20.0 },
            &mut store,
        );
        assert_eq!(store.theme(a).unwrap().colors().collect::<Vec<_>>(), vec![GREEN]);

        // cancelling an origin-less drag drops the payload
        drag.press(DragSource::Swatch { hsv: translucent }, (0.0, 0.0), false, true);
        drag.motion((0.0, 8.0), &mut store);
        assert_eq!(drag.cancel(&mut store), Some(DropOutcome::Discarded));
        assert_eq!(store.theme(a).unwrap().len(), 1);
    }

    #[test]
    fn trash_callbacks_bracket_every_drag() {
        let shown = Rc::new(Cell::new(0));
        let hidden = Rc::new(Cell::new(0));
        let (s, h) = (shown.clone(), hidden.clone());
        let mut drag =
            ColorDrag::new().on_trash_visibility(move || s.set(s.get() + 1), move || h.set(h.get() + 1));
        let (mut store, a) = store_with(&[RED, GREEN]);

        start_slot_drag(&mut drag, &mut store, a, 0);
        assert_eq!((shown.get(), hidden.get()), (1, 0));
        drag.drop_on(DropTarget::Trash, &mut store);
        assert_eq!((shown.get(), hidden.get()), (1, 1));

        start_slot_drag(&mut drag, &mut store, a, 0);
        drag.cancel(&mut store);
        assert_eq!((shown.get(), hidden.get()), (2, 2));
    }

    #[test]
    fn click_without_motion_is_not_a_drag() {
        let (mut store, a) = store_with(&[RED]);
        let mut drag = ColorDrag::new();
        drag.press(DragSource::ThemeSlot { theme: a, index: 0 }, (5.0, 5.0), true, false);
        drag.motion((7.0, 6.0), &mut store);
        drag.release();
        assert!(!drag.is_pressed());
        assert_eq!(drag.drop_on(DropTarget::Trash, &mut store), None);
        assert_eq!(store.theme(a).unwrap().len(), 1);
    }
}
