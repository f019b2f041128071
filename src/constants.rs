//! Sizing and styling constants for the picker widgets.

/// Spin slider track height
pub const SLIDER_HEIGHT: f32 = 18.0;

/// Spin slider width. Matches the narrowest width the drag mapping assumes.
pub const SLIDER_WIDTH: f32 = crate::spin_box::MIN_SLIDER_WIDTH as f32;

/// Border radius for slider tracks and swatches
pub const RADIUS: f32 = 4.0;

/// Gap between picker elements
pub const GAP: f32 = 8.0;

/// Padding around the whole picker
pub const PADDING: f32 = 8.0;

/// Channel label column width
pub const LABEL_WIDTH: f32 = 14.0;

/// Numeric input field width
pub const INPUT_WIDTH: f32 = 52.0;

/// Hex input field width
pub const HEX_INPUT_WIDTH: f32 = 64.0;

/// Input font size
pub const INPUT_FONT: f32 = 11.0;

/// Label font size
pub const LABEL_FONT: f32 = 10.0;

/// Height of the swatch strip (preview, theme bar, trash)
pub const STRIP_HEIGHT: f64 = 24.0;

/// Width of one theme bar slot
pub const SLOT_WIDTH: f64 = 16.0;

/// Width of the draggable preview block at the left of the strip
pub const PREVIEW_WIDTH: f64 = 32.0;

/// Width of the trash zone shown at the right of the strip while dragging
pub const TRASH_WIDTH: f64 = 24.0;

/// Checkerboard cell size behind translucent colors
pub const CHECKER_CELL: f64 = 4.0;
