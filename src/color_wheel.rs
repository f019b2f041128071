//! Hue/saturation wheel, shown when the picker is in wheel mode.
//!
//! Angle maps to hue in degrees and radius to saturation. The wheel is
//! rasterized once at full value and darkened with an overlay.

use std::sync::Arc;

use floem::kurbo::{Circle, Point, Rect, Stroke};
use floem::peniko::{self, Blob, Color};

use floem::reactive::create_effect;
use floem::views::Decorators;
use floem::{
    View, ViewId,
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
};
use floem_renderer::Renderer;

use crate::color::Hsv;
use crate::math;

/// Raster side in pixels; the renderer scales it to the widget.
const RASTER_SIZE: u32 = 256;

/// Feather width in raster pixels for anti-aliasing the circle edge.
const FEATHER: f64 = 3.0;

const CURSOR_RADIUS: f64 = 6.0;

/// Rasterize the wheel at V = 1 to sRGB-encoded RGBA8. Saturation reaches
/// 1.0 at the circle edge; the feather only affects alpha.
fn rasterize_wheel(size: u32) -> Vec<u8> {
    let c = size as f64 / 2.0;
    let radius = c - FEATHER;
    let mut buf = vec![0u8; (size * size * 4) as usize];

    for py in 0..size {
        let dy = py as f64 + 0.5 - c;
        for px in 0..size {
            let dx = px as f64 + 0.5 - c;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > radius + FEATHER {
                continue;
            }
            let alpha = ((radius + FEATHER - dist) / FEATHER).clamp(0.0, 1.0);
            let sat = (dist / radius).min(1.0);
            let hue = dy.atan2(dx).to_degrees().rem_euclid(360.0);

            let (r, g, b) = math::hsv_to_rgb(hue, sat, 1.0);
            let offset = ((py * size + px) * 4) as usize;
            buf[offset] = math::quantize(r, true);
            buf[offset + 1] = math::quantize(g, true);
            buf[offset + 2] = math::quantize(b, true);
            buf[offset + 3] = math::quantize(alpha, false);
        }
    }
    buf
}

pub(crate) struct ColorWheel {
    id: ViewId,
    held: bool,
    hsv: Hsv,
    size: floem::taffy::prelude::Size<f32>,
    on_change: Box<dyn Fn(f64, f64)>,
    wheel_img: Option<peniko::Image>,
    wheel_hash: Vec<u8>,
}

/// Creates a color wheel tracking `hsv`. `on_change` receives the new hue in
/// degrees and saturation.
pub(crate) fn color_wheel(
    hsv: impl Fn() -> Hsv + 'static,
    on_change: impl Fn(f64, f64) + 'static,
) -> ColorWheel {
    let id = ViewId::new();
    let initial = hsv();

    create_effect(move |_| {
        id.update_state(hsv());
    });

    ColorWheel {
        id,
        held: false,
        hsv: initial,
        size: Default::default(),
        on_change: Box::new(on_change),
        wheel_img: None,
        wheel_hash: Vec::new(),
    }
    .style(|s| {
        s.flex_grow(1.0)
            .aspect_ratio(1.0)
            .min_height(100.0)
            .cursor(floem::style::CursorStyle::Default)
    })
}

impl ColorWheel {
    fn radius(&self) -> f64 {
        (self.size.width as f64).min(self.size.height as f64) / 2.0
    }

    fn center(&self) -> Point {
        Point::new(self.size.width as f64 / 2.0, self.size.height as f64 / 2.0)
    }

    fn pick(&mut self, pos: Point) {
        let center = self.center();
        let radius = self.radius();
        if radius <= 0.0 {
            return;
        }
        let d = pos - center;
        self.hsv.h = d.y.atan2(d.x).to_degrees().rem_euclid(360.0);
        self.hsv.s = (d.hypot() / radius).clamp(0.0, 1.0);
        (self.on_change)(self.hsv.h, self.hsv.s);
        self.id.request_paint();
    }

    fn cursor_position(&self) -> Point {
        let center = self.center();
        let angle = self.hsv.h.to_radians();
        let r = self.hsv.s * self.radius();
        Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r)
    }

    fn ensure_wheel_image(&mut self) {
        if self.wheel_img.is_some() {
            return;
        }
        let pixels = rasterize_wheel(RASTER_SIZE);
        let blob = Blob::new(Arc::new(pixels));
        self.wheel_img = Some(peniko::Image::new(
            blob,
            peniko::Format::Rgba8,
            RASTER_SIZE,
            RASTER_SIZE,
        ));
        self.wheel_hash = b"hsv-wheel".to_vec();
    }
}

impl View for ColorWheel {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(hsv) = state.downcast::<Hsv>() {
            self.hsv = *hsv;
            self.id.request_paint();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                self.pick(e.pos);
                EventPropagation::Stop
            }
            Event::PointerMove(e) if self.held => {
                self.pick(e.pos);
                EventPropagation::Stop
            }
            Event::PointerUp(_) | Event::FocusLost => {
                self.held = false;
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
        let radius = self.radius();
        if radius <= 0.0 {
            return;
        }
        let center = self.center();
        let clip = Circle::new(center, radius);
        let rect = Rect::from_center_size(center, (radius * 2.0, radius * 2.0));

        cx.save();
        cx.clip(&clip);
        self.ensure_wheel_image();
        if let Some(ref img) = self.wheel_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.wheel_hash,
                },
                rect,
            );
        }
        let overlay_alpha = 1.0 - math::linear_to_srgb(self.hsv.v);
        if overlay_alpha > 0.001 {
            cx.fill(&clip, Color::rgba(0.0, 0.0, 0.0, overlay_alpha), 0.0);
        }
        cx.restore();

        let cursor = self.cursor_position();
        cx.stroke(
            &Circle::new(cursor, CURSOR_RADIUS + 1.0),
            Color::rgba8(0, 0, 0, 80),
            &Stroke::new(1.0),
        );
        cx.stroke(&Circle::new(cursor, CURSOR_RADIUS), Color::WHITE, &Stroke::new(2.0));
    }
}
