//! Aspect-preserving fit of an image into a bounded viewport.

/// A width/height pair in arbitrary but consistent units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// The empty box, meaning "nothing to display".
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// Create a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Create a size from integer pixel dimensions.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(f64::from(width), f64::from(height))
    }

    /// Scale both dimensions by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Whether the box has a positive, finite area.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// How an image smaller than the viewport is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitPolicy {
    /// Both candidates are capped by the intrinsic size, so small images
    /// keep their natural size.
    #[default]
    ShrinkOnly,
    /// Scale the image up until one viewport dimension is reached.
    Fill,
}

/// Compute the display box for an image inside `viewport`.
///
/// Returns [`Size::ZERO`] when the intrinsic size is missing or degenerate.
/// The result keeps the intrinsic aspect ratio and never exceeds the
/// viewport in either dimension.
pub fn fit(intrinsic: Option<Size>, viewport: Size, policy: FitPolicy) -> Size {
    let Some(intrinsic) = intrinsic.filter(Size::is_drawable) else {
        return Size::ZERO;
    };
    if !viewport.is_drawable() {
        return Size::ZERO;
    }

    let ratio = intrinsic.width / intrinsic.height;
    let (resize_width, resize_height) = match policy {
        FitPolicy::ShrinkOnly => (
            viewport.width.min(intrinsic.width),
            viewport.height.min(intrinsic.height),
        ),
        FitPolicy::Fill => (viewport.width, viewport.height),
    };

    if resize_height * ratio > resize_width {
        Size::new(resize_width, resize_width / ratio)
    } else {
        Size::new(resize_height * ratio, resize_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: Size, expected: Size) {
        assert!(
            (actual.width - expected.width).abs() < EPSILON
                && (actual.height - expected.height).abs() < EPSILON,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_exact_viewport_ratio() {
        let window = Size::new(1600.0, 900.0);
        let boxed = fit(
            Some(Size::new(1600.0, 900.0)),
            window.scaled(0.9),
            FitPolicy::ShrinkOnly,
        );
        assert_close(boxed, Size::new(1440.0, 810.0));
    }

    #[test]
    fn test_width_bound() {
        let boxed = fit(
            Some(Size::new(2000.0, 1000.0)),
            Size::new(900.0, 900.0),
            FitPolicy::ShrinkOnly,
        );
        assert_close(boxed, Size::new(900.0, 450.0));
    }

    #[test]
    fn test_height_bound() {
        let boxed = fit(
            Some(Size::new(1000.0, 3000.0)),
            Size::new(900.0, 900.0),
            FitPolicy::ShrinkOnly,
        );
        assert_close(boxed, Size::new(300.0, 900.0));
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let intrinsic = Size::new(1234.0, 567.0);
        let boxed = fit(Some(intrinsic), Size::new(640.0, 480.0), FitPolicy::ShrinkOnly);
        let expected = intrinsic.width / intrinsic.height;
        assert!((boxed.width / boxed.height - expected).abs() < 1e-6);
        assert!(boxed.width <= 640.0 + EPSILON);
        assert!(boxed.height <= 480.0 + EPSILON);
    }

    #[test]
    fn test_small_image_keeps_natural_size() {
        let boxed = fit(
            Some(Size::new(200.0, 100.0)),
            Size::new(900.0, 900.0),
            FitPolicy::ShrinkOnly,
        );
        assert_close(boxed, Size::new(200.0, 100.0));
    }

    #[test]
    fn test_fill_scales_small_image_up() {
        let boxed = fit(
            Some(Size::new(200.0, 100.0)),
            Size::new(900.0, 900.0),
            FitPolicy::Fill,
        );
        assert_close(boxed, Size::new(900.0, 450.0));
    }

    #[test]
    fn test_fill_matches_shrink_for_large_image() {
        let intrinsic = Some(Size::new(4000.0, 3000.0));
        let viewport = Size::new(800.0, 600.0);
        assert_close(
            fit(intrinsic, viewport, FitPolicy::Fill),
            fit(intrinsic, viewport, FitPolicy::ShrinkOnly),
        );
    }

    #[test]
    fn test_missing_size_is_zero() {
        assert_eq!(
            fit(None, Size::new(900.0, 900.0), FitPolicy::ShrinkOnly),
            Size::ZERO
        );
    }

    #[test]
    fn test_zero_dimension_is_zero() {
        let viewport = Size::new(900.0, 900.0);
        assert_eq!(
            fit(Some(Size::new(0.0, 100.0)), viewport, FitPolicy::ShrinkOnly),
            Size::ZERO
        );
        assert_eq!(
            fit(Some(Size::new(100.0, 0.0)), viewport, FitPolicy::Fill),
            Size::ZERO
        );
    }

    #[test]
    fn test_degenerate_viewport_is_zero() {
        assert_eq!(
            fit(
                Some(Size::new(100.0, 100.0)),
                Size::new(0.0, 50.0),
                FitPolicy::ShrinkOnly
            ),
            Size::ZERO
        );
    }

    #[test]
    fn test_from_pixels() {
        assert_eq!(Size::from_pixels(3, 4), Size::new(3.0, 4.0));
        assert!(!Size::from_pixels(0, 4).is_drawable());
    }
}
