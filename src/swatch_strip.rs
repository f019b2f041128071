//! Swatch strip: the picker's preview block, the current theme's bar and a
//! trash zone, in one row.
//!
//! Dragging the preview onto the bar adds a copy of the picked color.
//! Dragging a slot moves it within the bar or, dropped on the trash, deletes
//! it. Clicking a slot picks its color.

use std::cell::RefCell;
use std::rc::Rc;

use floem::event::EventPropagation;
use floem::keyboard::{Key, NamedKey};
use floem::kurbo::{Line, Point, Rect, Stroke};
use floem::peniko::Color;
use floem::reactive::{RwSignal, SignalGet, SignalUpdate, create_effect};
use floem::views::Decorators;
use floem::{
    View, ViewId,
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::Event,
};
use floem_renderer::Renderer;
use tracing::trace;

use crate::checkerboard::paint_swatch;
use crate::color::LinearColor;
use crate::config::ConfigStore;
use crate::constants::{GAP, PREVIEW_WIDTH, SLOT_WIDTH, STRIP_HEIGHT, TRASH_WIDTH};
use crate::drag::{ColorDrag, DragSource, DropOutcome, DropTarget};
use crate::picker::PickerContext;

const DRAG_GHOST_SIZE: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Region {
    Preview,
    Bar { local_x: f64 },
    Trash,
    Outside,
}

pub(crate) struct SwatchStrip<C: ConfigStore + 'static> {
    id: ViewId,
    ctx: Rc<RefCell<PickerContext<C>>>,
    drag: ColorDrag,
    pressed_slot: Option<usize>,
    pointer: Point,
    revision: RwSignal<u64>,
    on_pick: Box<dyn Fn(LinearColor)>,
    size: floem::taffy::prelude::Size<f32>,
}

/// Creates the swatch strip.
///
/// `revision` is bumped after every theme change the strip makes and
/// repaints the strip when anyone else bumps it. `trash_visible` tracks
/// whether a drag is in flight.
pub(crate) fn swatch_strip<C: ConfigStore + 'static>(
    ctx: Rc<RefCell<PickerContext<C>>>,
    revision: RwSignal<u64>,
    trash_visible: RwSignal<bool>,
    on_pick: impl Fn(LinearColor) + 'static,
) -> SwatchStrip<C> {
    let id = ViewId::new();

    create_effect(move |_| {
        revision.get();
        id.update_state(());
    });

    let drag = ColorDrag::new()
        .on_trash_visibility(move || trash_visible.set(true), move || trash_visible.set(false));

    SwatchStrip {
        id,
        ctx,
        drag,
        pressed_slot: None,
        pointer: Point::ZERO,
        revision,
        on_pick: Box::new(on_pick),
        size: Default::default(),
    }
    .style(|s| {
        s.height(STRIP_HEIGHT as f32)
            .width_full()
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl<C: ConfigStore + 'static> SwatchStrip<C> {
    fn bar_start() -> f64 {
        PREVIEW_WIDTH + GAP as f64
    }

    fn bar_end(&self) -> f64 {
        self.size.width as f64 - TRASH_WIDTH - GAP as f64
    }

    fn region(&self, pos: Point) -> Region {
        let w = self.size.width as f64;
        if pos.y < 0.0 || pos.y > STRIP_HEIGHT || pos.x < 0.0 || pos.x > w {
            Region::Outside
        } else if pos.x < PREVIEW_WIDTH {
            Region::Preview
        } else if pos.x >= Self::bar_start() && pos.x < self.bar_end() {
            Region::Bar {
                local_x: pos.x - Self::bar_start(),
            }
        } else if pos.x >= w - TRASH_WIDTH && self.drag.is_dragging() {
            Region::Trash
        } else {
            Region::Outside
        }
    }

    fn themes_changed(&self) {
        self.revision.update(|r| *r += 1);
        self.id.request_paint();
    }

    fn pointer_down(&mut self, pos: Point) -> EventPropagation {
        let ctx = self.ctx.borrow();
        let Some(picker) = ctx.picker() else {
            return EventPropagation::Continue;
        };
        let (use_alpha, srgb) = (picker.use_alpha(), picker.srgb());
        let source = match self.region(pos) {
            Region::Preview => DragSource::Swatch { hsv: picker.hsv() },
            Region::Bar { local_x } => {
                let theme = ctx.themes().current_theme();
                let index = (local_x / SLOT_WIDTH) as usize;
                if index >= theme.len() {
                    return EventPropagation::Continue;
                }
                self.pressed_slot = Some(index);
                DragSource::ThemeSlot {
                    theme: theme.id(),
                    index,
                }
            }
            _ => return EventPropagation::Continue,
        };
        drop(ctx);
        self.drag.press(source, (pos.x, pos.y), use_alpha, srgb);
        EventPropagation::Stop
    }

    fn pointer_move(&mut self, pos: Point) -> EventPropagation {
        self.pointer = pos;
        if !self.drag.is_pressed() && !self.drag.is_dragging() {
            return EventPropagation::Continue;
        }
        let started = self
            .drag
            .motion((pos.x, pos.y), self.ctx.borrow_mut().themes_mut());
        if started {
            self.pressed_slot = None;
            self.themes_changed();
        }
        if self.drag.is_dragging() {
            let ctx = self.ctx.borrow();
            let theme = ctx.themes().current_theme().id();
            let over = match self.region(pos) {
                Region::Bar { local_x } => Some((theme, local_x, SLOT_WIDTH)),
                _ => None,
            };
            self.drag.hover(over, ctx.themes());
            self.id.request_paint();
        }
        EventPropagation::Stop
    }

    fn pointer_up(&mut self, pos: Point) -> EventPropagation {
        if self.drag.is_pressed() {
            self.drag.release();
            if let Some(index) = self.pressed_slot.take() {
                let color = self
                    .ctx
                    .borrow()
                    .themes()
                    .current_theme()
                    .swatches()
                    .get(index)
                    .map(|s| s.color);
                if let Some(color) = color {
                    (self.on_pick)(color);
                }
            }
            return EventPropagation::Stop;
        }
        if !self.drag.is_dragging() {
            return EventPropagation::Continue;
        }
        let target = {
            let ctx = self.ctx.borrow();
            match self.region(pos) {
                Region::Bar { local_x } => DropTarget::ThemeBar {
                    theme: ctx.themes().current_theme().id(),
                    local_x,
                    slot_width: SLOT_WIDTH,
                },
                Region::Trash => DropTarget::Trash,
                _ => DropTarget::Rejecting,
            }
        };
        self.resolve(Some(target));
        EventPropagation::Stop
    }

    /// Finish the drag over `target`, or cancel it with `None`.
    fn resolve(&mut self, target: Option<DropTarget>) {
        self.pressed_slot = None;
        let outcome = {
            let mut ctx = self.ctx.borrow_mut();
            match target {
                Some(target) => self.drag.drop_on(target, ctx.themes_mut()),
                None => self.drag.cancel(ctx.themes_mut()),
            }
        };
        if let Some(outcome) = outcome {
            if let DropOutcome::Inserted { index, .. } = outcome {
                trace!(index, "swatch dropped on theme bar");
            }
            self.themes_changed();
        }
    }

    fn paint_bar(&self, cx: &mut PaintCx, ctx: &PickerContext<C>, srgb: bool) {
        let start = Self::bar_start();
        let end = self.bar_end();
        let bar = Rect::new(start, 0.0, end.max(start), STRIP_HEIGHT);
        cx.fill(&bar, Color::rgb8(228, 228, 228), 0.0);

        let theme = ctx.themes().current_theme();
        for (i, swatch) in theme.swatches().iter().enumerate() {
            let x0 = start + i as f64 * SLOT_WIDTH;
            if x0 + SLOT_WIDTH > end {
                break;
            }
            let rect = Rect::new(x0 + 1.0, 2.0, x0 + SLOT_WIDTH - 1.0, STRIP_HEIGHT - 2.0);
            paint_swatch(cx, rect, &swatch.color, srgb);
        }

        if let Some((id, index)) = self.drag.hover_preview()
            && id == theme.id()
        {
            let x = start + index as f64 * SLOT_WIDTH;
            cx.stroke(
                &Line::new((x, 0.0), (x, STRIP_HEIGHT)),
                Color::rgb8(40, 110, 230),
                &Stroke::new(2.0),
            );
        }
    }

    fn paint_trash(&self, cx: &mut PaintCx) {
        let w = self.size.width as f64;
        let trash = Rect::new(w - TRASH_WIDTH, 0.0, w, STRIP_HEIGHT)
            .to_rounded_rect(crate::constants::RADIUS as f64);
        let hot = matches!(self.region(self.pointer), Region::Trash);
        let fill = if hot {
            Color::rgb8(230, 90, 90)
        } else {
            Color::rgb8(240, 190, 190)
        };
        cx.fill(&trash, fill, 0.0);
        cx.stroke(&trash, Color::rgba8(0, 0, 0, 60), &Stroke::new(1.0));
    }
}

impl<C: ConfigStore + 'static> View for SwatchStrip<C> {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, _state: Box<dyn std::any::Any>) {
        self.id.request_paint();
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                let propagation = self.pointer_down(e.pos);
                if matches!(propagation, EventPropagation::Stop) {
                    cx.update_active(self.id());
                    self.id.request_focus();
                }
                propagation
            }
            Event::PointerMove(e) => self.pointer_move(e.pos),
            Event::PointerUp(e) => self.pointer_up(e.pos),
            Event::KeyDown(ke) if ke.key.logical_key == Key::Named(NamedKey::Escape) => {
                if self.drag.is_dragging() {
                    self.resolve(None);
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::FocusLost => {
                if self.drag.is_dragging() {
                    self.resolve(None);
                } else {
                    self.drag.release();
                    self.pressed_slot = None;
                }
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
        if self.size.width == 0.0 {
            return;
        }
        let ctx = self.ctx.borrow();
        let Some(picker) = ctx.picker() else {
            return;
        };
        let srgb = picker.srgb();

        let preview = Rect::new(0.0, 0.0, PREVIEW_WIDTH, STRIP_HEIGHT);
        paint_swatch(cx, preview, &picker.commit(), srgb);
        self.paint_bar(cx, &ctx, srgb);

        if let Some(payload) = self.drag.payload() {
            self.paint_trash(cx);
            let half = DRAG_GHOST_SIZE / 2.0;
            let ghost = Rect::new(
                self.pointer.x - half,
                self.pointer.y - half,
                self.pointer.x + half,
                self.pointer.y + half,
            );
            paint_swatch(cx, ghost, &payload.color(), payload.use_srgb);
        }
    }
}
