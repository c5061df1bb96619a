//! Half-block image rendering.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as the background. A cell is roughly
//! twice as tall as it is wide, so half-block pixels come out close to square.

use image::{imageops::FilterType, DynamicImage, Rgb, RgbImage};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

const UPPER_HALF_BLOCK: char = '▀';

/// Resize `image` so it exactly covers `cols` x `rows` cells.
pub fn rasterize(image: &DynamicImage, cols: u16, rows: u16) -> RgbImage {
    let width = u32::from(cols.max(1));
    let height = u32::from(rows.max(1)) * 2;
    image.resize_exact(width, height, FilterType::Triangle).to_rgb8()
}

/// Widget drawing a rasterized image with half blocks.
pub struct HalfBlocks<'a> {
    pixels: &'a RgbImage,
}

impl<'a> HalfBlocks<'a> {
    /// Wrap pixels produced by [`rasterize`].
    pub fn new(pixels: &'a RgbImage) -> Self {
        Self { pixels }
    }
}

impl Widget for HalfBlocks<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.pixels.dimensions();
        let cols = area.width.min(u16::try_from(width).unwrap_or(u16::MAX));
        let rows = area
            .height
            .min(u16::try_from((height + 1) / 2).unwrap_or(u16::MAX));

        for row in 0..rows {
            let top_y = u32::from(row) * 2;
            for col in 0..cols {
                let x = u32::from(col);
                let top = to_color(self.pixels.get_pixel(x, top_y));
                let bottom = (top_y + 1 < height)
                    .then(|| to_color(self.pixels.get_pixel(x, top_y + 1)));

                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(UPPER_HALF_BLOCK).set_fg(top);
                    if let Some(bottom) = bottom {
                        cell.set_bg(bottom);
                    }
                }
            }
        }
    }
}

fn to_color(pixel: &Rgb<u8>) -> Color {
    let [r, g, b] = pixel.0;
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_image() -> DynamicImage {
        // Red top half, blue bottom half.
        let img = RgbImage::from_fn(4, 4, |_, y| {
            if y < 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_rasterize_dimensions() {
        let pixels = rasterize(&split_image(), 3, 2);
        assert_eq!(pixels.dimensions(), (3, 4));
    }

    #[test]
    fn test_rasterize_clamps_zero_cells() {
        let pixels = rasterize(&split_image(), 0, 0);
        assert_eq!(pixels.dimensions(), (1, 2));
    }

    #[test]
    fn test_render_sets_upper_and_lower_colors() {
        let pixels = RgbImage::from_fn(2, 2, |_, y| {
            if y == 0 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        HalfBlocks::new(&pixels).render(area, &mut buf);

        let cell = buf.cell((0, 0)).expect("cell in area");
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_render_respects_offset_area() {
        let pixels = RgbImage::from_pixel(1, 2, Rgb([10, 20, 30]));
        let full = Rect::new(0, 0, 4, 3);
        let mut buf = Buffer::empty(full);
        HalfBlocks::new(&pixels).render(Rect::new(2, 1, 2, 2), &mut buf);

        let symbol_at = |x: u16, y: u16| buf.cell((x, y)).map(|c| c.symbol().to_string());
        assert_eq!(buf.cell((2, 1)).map(|c| c.fg), Some(Color::Rgb(10, 20, 30)));
        assert_eq!(symbol_at(0, 0).as_deref(), Some(" "));
        // Image is one cell wide, the neighbour stays untouched.
        assert_eq!(symbol_at(3, 1).as_deref(), Some(" "));
    }

    #[test]
    fn test_odd_height_leaves_background() {
        let pixels = RgbImage::from_pixel(1, 1, Rgb([1, 2, 3]));
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        HalfBlocks::new(&pixels).render(area, &mut buf);

        let cell = buf.cell((0, 0)).expect("cell in area");
        assert_eq!(cell.fg, Color::Rgb(1, 2, 3));
        assert_eq!(cell.bg, Color::Reset);
    }
}
