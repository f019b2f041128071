//! Checkerboard backdrop for swatches with alpha.

use floem::context::PaintCx;
use floem::kurbo::{Rect, RoundedRect};
use floem::peniko::Color;
use floem_renderer::Renderer;

use crate::color::LinearColor;
use crate::constants;

const LIGHT: Color = Color::rgb8(255, 255, 255);
const DARK: Color = Color::rgb8(204, 204, 204);

/// Paint a checkerboard pattern into `rect`. Cells are anchored at the rect
/// origin so adjacent swatches do not line up.
pub(crate) fn paint_checkerboard(cx: &mut PaintCx, rect: Rect) {
    let cell = constants::CHECKER_CELL;
    cx.fill(&rect, LIGHT, 0.0);
    let cols = (rect.width() / cell).ceil() as usize;
    let rows = (rect.height() / cell).ceil() as usize;
    for row in 0..rows {
        for col in (row % 2..cols).step_by(2) {
            let x = rect.x0 + col as f64 * cell;
            let y = rect.y0 + row as f64 * cell;
            let cell_rect = Rect::new(x, y, (x + cell).min(rect.x1), (y + cell).min(rect.y1));
            cx.fill(&cell_rect, DARK, 0.0);
        }
    }
}

/// Display color for a linear swatch, sRGB encoded when `srgb` is set.
pub(crate) fn display_color(color: &LinearColor, srgb: bool) -> Color {
    let c = color.quantize(srgb);
    Color::rgba8(c.r, c.g, c.b, c.a)
}

/// Fill `rect` with `color`, backed by a checkerboard when it is not opaque.
pub(crate) fn paint_swatch(cx: &mut PaintCx, rect: Rect, color: &LinearColor, srgb: bool) {
    let rrect = RoundedRect::from_rect(rect, constants::RADIUS as f64);
    cx.save();
    cx.clip(&rrect);
    if color.a < 1.0 {
        paint_checkerboard(cx, rect);
    }
    cx.fill(&rect, display_color(color, srgb), 0.0);
    cx.restore();
    cx.stroke(
        &rrect,
        Color::rgba8(0, 0, 0, 40),
        &floem::kurbo::Stroke::new(1.0),
    );
}
