//! Image preview popup.
//!
//! The popup is sized with [`fit`] from the post's sample dimensions, so it
//! has its final size while the image is still downloading.

use crossterm::event::{KeyCode, KeyEvent};
use image::{DynamicImage, RgbImage};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::api::Post;
use crate::preview::{centered_cells, fit, rasterize, viewport_for, FitPolicy, HalfBlocks, Size};
use crate::ui::theme;

/// Actions that can be returned from the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    Close,
    /// Show the next post of the page.
    Next,
    /// Show the previous post of the page.
    Prev,
}

#[derive(Debug)]
enum PreviewState {
    Loading,
    Ready(DynamicImage),
    Failed(String),
}

/// Popup showing one post's sample image.
#[derive(Debug)]
pub struct PreviewView {
    post: Post,
    state: PreviewState,
    /// Last rasterization and the cell size it was made for.
    cache: Option<((u16, u16), RgbImage)>,
}

impl PreviewView {
    /// Open the preview for `post`, waiting for its image.
    pub fn new(post: Post) -> Self {
        Self {
            post,
            state: PreviewState::Loading,
            cache: None,
        }
    }

    /// The previewed post.
    pub fn post(&self) -> &Post {
        &self.post
    }

    /// Whether the image is still being fetched.
    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, PreviewState::Loading)
    }

    /// The downloaded image arrived.
    pub fn set_image(&mut self, image: DynamicImage) {
        self.state = PreviewState::Ready(image);
        self.cache = None;
    }

    /// The download or decode failed.
    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.state = PreviewState::Failed(message.into());
    }

    /// Intrinsic image size: the decoded image if present, else the
    /// dimensions the board reported.
    fn intrinsic(&self) -> Option<Size> {
        match &self.state {
            PreviewState::Ready(image) => Some(Size::from_pixels(image.width(), image.height())),
            _ => self.post.sample_size(),
        }
    }

    /// The popup rectangle inside `area`, or `None` when nothing can be shown.
    pub fn popup_area(&self, area: Rect, fraction: f64, policy: FitPolicy) -> Option<Rect> {
        let boxed = fit(self.intrinsic(), viewport_for(area, fraction), policy);
        centered_cells(area, boxed)
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<PreviewAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(PreviewAction::Close),
            KeyCode::Right | KeyCode::Char('l') => Some(PreviewAction::Next),
            KeyCode::Left | KeyCode::Char('h') => Some(PreviewAction::Prev),
            _ => None,
        }
    }

    /// Render the popup over `area`.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, fraction: f64, policy: FitPolicy) {
        let Some(popup) = self.popup_area(area, fraction, policy) else {
            return;
        };
        frame.render_widget(Clear, popup);

        match &self.state {
            PreviewState::Loading => {
                let text = format!("Loading #{}...", self.post.id);
                let style = Style::default().fg(theme::MUTED);
                render_message(frame, popup, Span::styled(text, style));
            }
            PreviewState::Failed(message) => {
                let text = format!("#{}: {}", self.post.id, message);
                let style = Style::default().fg(Color::Red);
                render_message(frame, popup, Span::styled(text, style));
            }
            PreviewState::Ready(image) => {
                let size = (popup.width, popup.height);
                let stale = self
                    .cache
                    .as_ref()
                    .map_or(true, |(cached, _)| *cached != size);
                if stale {
                    self.cache = Some((size, rasterize(image, popup.width, popup.height)));
                }
                if let Some((_, pixels)) = &self.cache {
                    frame.render_widget(HalfBlocks::new(pixels), popup);
                }
            }
        }
    }
}

fn render_message(frame: &mut Frame, area: Rect, span: Span<'static>) {
    let row = Rect {
        y: area.y + area.height / 2,
        height: 1.min(area.height),
        ..area
    };
    frame.render_widget(
        Paragraph::new(Line::from(span))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        row,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use image::Rgb;
    use ratatui::{backend::TestBackend, Terminal};

    fn post(sample: Option<(u32, u32)>) -> Post {
        let mut json = serde_json::json!({ "id": 42 });
        if let Some((w, h)) = sample {
            json["sample_width"] = w.into();
            json["sample_height"] = h.into();
        }
        serde_json::from_value(json).unwrap()
    }

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 50,
    };

    #[test]
    fn test_popup_uses_sample_size_while_loading() {
        // 100x50 cells is a 100x100 half-block viewport, 90x90 at 0.9.
        let view = PreviewView::new(post(Some((1600, 900))));
        let popup = view
            .popup_area(AREA, 0.9, FitPolicy::ShrinkOnly)
            .expect("drawable");
        assert_eq!(popup.width, 90);
        // 90 / (16/9) = 50.625 pixels, 26 rows.
        assert_eq!(popup.height, 26);
    }

    #[test]
    fn test_missing_size_renders_nothing() {
        let view = PreviewView::new(post(None));
        assert!(view.popup_area(AREA, 0.9, FitPolicy::ShrinkOnly).is_none());
    }

    #[test]
    fn test_decoded_image_size_takes_over() {
        let mut view = PreviewView::new(post(None));
        view.set_image(DynamicImage::ImageRgb8(RgbImage::new(20, 10)));
        let popup = view
            .popup_area(AREA, 0.9, FitPolicy::ShrinkOnly)
            .expect("drawable");
        assert_eq!((popup.width, popup.height), (20, 5));
    }

    #[test]
    fn test_fill_policy_upscales() {
        let mut view = PreviewView::new(post(None));
        view.set_image(DynamicImage::ImageRgb8(RgbImage::new(20, 10)));
        let popup = view.popup_area(AREA, 1.0, FitPolicy::Fill).expect("drawable");
        assert_eq!((popup.width, popup.height), (100, 25));
    }

    #[test]
    fn test_keys() {
        let mut view = PreviewView::new(post(None));
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(view.handle_input(key(KeyCode::Esc)), Some(PreviewAction::Close));
        assert_eq!(view.handle_input(key(KeyCode::Right)), Some(PreviewAction::Next));
        assert_eq!(view.handle_input(key(KeyCode::Left)), Some(PreviewAction::Prev));
        assert_eq!(view.handle_input(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_render_ready_image() {
        let mut view = PreviewView::new(post(None));
        view.set_image(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            4,
            4,
            Rgb([200, 10, 10]),
        )));
        assert!(!view.is_loading());

        let mut terminal = Terminal::new(TestBackend::new(10, 10)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area(), 1.0, FitPolicy::ShrinkOnly))
            .unwrap();

        // 4x4 pixels -> 4 columns x 2 rows, centered in 10x10.
        let cell = terminal.backend().buffer().cell((3, 4)).unwrap();
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(200, 10, 10));
    }
}
