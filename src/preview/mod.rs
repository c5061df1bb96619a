//! Image preview sizing and rendering.

mod fit;
mod halfblock;

use ratatui::layout::Rect;

pub use fit::{fit, FitPolicy, Size};
pub use halfblock::{rasterize, HalfBlocks};

/// Default share of the terminal the preview may occupy.
pub const DEFAULT_VIEWPORT_FRACTION: f64 = 0.9;

/// The viewport box for `area`, in half-block pixels.
///
/// A cell holds one pixel horizontally and two vertically.
pub fn viewport_for(area: Rect, fraction: f64) -> Size {
    Size::new(f64::from(area.width), f64::from(area.height) * 2.0).scaled(fraction)
}

/// Center a fitted box (in half-block pixels) inside `area`, in cells.
///
/// Returns `None` for an empty box so the caller skips the preview surface.
pub fn centered_cells(area: Rect, boxed: Size) -> Option<Rect> {
    if !boxed.is_drawable() {
        return None;
    }

    let cols = (boxed.width.round() as u16).clamp(1, area.width.max(1));
    let rows = ((boxed.height / 2.0).ceil() as u16).clamp(1, area.height.max(1));
    let x = area.x + (area.width.saturating_sub(cols)) / 2;
    let y = area.y + (area.height.saturating_sub(rows)) / 2;

    Some(Rect::new(x, y, cols.min(area.width), rows.min(area.height)))
}
