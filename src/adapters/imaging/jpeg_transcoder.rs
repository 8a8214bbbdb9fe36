//! JPEG transcoder for the embedded display pipeline.
//!
//! Decodes any raster format the `image` crate understands, fits the
//! result into the display canvas with aspect-preserving letterboxing,
//! and re-encodes as JPEG at a bounded quality so a full frame stays
//! small enough for the device link.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::domain::display::{CanvasSize, FitBox};
use crate::ports::{ImageTranscoder, TranscodeError};

/// Letterbox background. The display bezel is black, so black bars
/// disappear into it.
const LETTERBOX_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Production [`ImageTranscoder`] backed by the `image` crate.
pub struct JpegTranscoder {
    quality: u8,
}

impl JpegTranscoder {
    /// Create a transcoder with the given JPEG quality (1..=100).
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }
}

impl ImageTranscoder for JpegTranscoder {
    fn transcode(&self, source: &[u8], canvas: CanvasSize) -> Result<Vec<u8>, TranscodeError> {
        let decoded = image::load_from_memory(source)
            .map_err(|e| TranscodeError::Decode(e.to_string()))?;

        let fit = FitBox::compute(decoded.width(), decoded.height(), canvas);
        debug!(
            source_width = decoded.width(),
            source_height = decoded.height(),
            %canvas,
            scaled_width = fit.width,
            scaled_height = fit.height,
            "transcoding image for display"
        );

        // Triangle filtering smooths the downscale; nearest-neighbor
        // aliases badly on a 160x128 panel.
        let scaled = decoded
            .resize_exact(fit.width, fit.height, FilterType::Triangle)
            .to_rgb8();

        let mut frame = RgbImage::from_pixel(canvas.width, canvas.height, LETTERBOX_FILL);
        image::imageops::overlay(&mut frame, &scaled, i64::from(fit.x), i64::from(fit.y));

        let mut out = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut out, self.quality)
            .encode_image(&frame)
            .map_err(|e| TranscodeError::Encode(e.to_string()))?;

        Ok(out.into_inner())
    }
}
