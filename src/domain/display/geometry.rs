//! Letterbox geometry for the fixed-size display canvas.
//!
//! The math lives here, away from the image encoder, so the documented
//! formulas stay unit-testable: `scale = min(W/srcW, H/srcH)`, scaled
//! dimensions round to nearest, offsets center with integer floor division.

/// Target canvas dimensions for a device class (e.g. 160x128 for the
/// ST7735S table display).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Placement of a scaled source image on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitBox {
    /// Scaled image width.
    pub width: u32,
    /// Scaled image height.
    pub height: u32,
    /// Left padding bar width.
    pub x: u32,
    /// Top padding bar height.
    pub y: u32,
}

impl FitBox {
    /// Fit a source image into the canvas, preserving aspect ratio.
    ///
    /// Scaled dimensions are rounded to the nearest pixel and the image is
    /// centered; offsets use floor division, so odd padding leaves the
    /// extra pixel on the bottom/right bar.
    pub fn compute(source_width: u32, source_height: u32, canvas: CanvasSize) -> FitBox {
        let scale = f64::min(
            f64::from(canvas.width) / f64::from(source_width),
            f64::from(canvas.height) / f64::from(source_height),
        );

        // Degenerate aspect ratios still draw at least one pixel.
        let width = ((f64::from(source_width) * scale).round() as u32).max(1);
        let height = ((f64::from(source_height) * scale).round() as u32).max(1);

        FitBox {
            width,
            height,
            x: (canvas.width - width) / 2,
            y: (canvas.height - height) / 2,
        }
    }
}
