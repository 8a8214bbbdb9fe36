//! Embedded display configuration
//!
//! Defaults match the deployed hardware: an ST7735S 160x128 panel driven
//! by an ESP32 whose WebSocket receive buffer tolerates roughly one 4000
//! character frame every 40 milliseconds.

use serde::Deserialize;

use crate::domain::display::CanvasSize;

use super::error::ValidationError;

/// Display pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Target canvas width in pixels
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,

    /// Target canvas height in pixels
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,

    /// JPEG re-encode quality (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Characters per image chunk frame
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Pacing delay between successive chunk frames, in milliseconds
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,

    /// Per-connection outbound frame buffer capacity
    #[serde(default = "default_send_buffer")]
    pub send_buffer: usize,

    /// Directory the named-asset push endpoint reads from
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
}

impl DisplayConfig {
    /// Target canvas as a domain value
    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    /// Validate display configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ValidationError::InvalidCanvas);
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(ValidationError::InvalidQuality);
        }
        if self.chunk_size == 0 {
            return Err(ValidationError::InvalidChunkSize);
        }
        if self.send_buffer == 0 {
            return Err(ValidationError::InvalidSendBuffer);
        }
        Ok(())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            jpeg_quality: default_jpeg_quality(),
            chunk_size: default_chunk_size(),
            chunk_delay_ms: default_chunk_delay_ms(),
            send_buffer: default_send_buffer(),
            assets_dir: default_assets_dir(),
        }
    }
}

fn default_canvas_width() -> u32 {
    160
}

fn default_canvas_height() -> u32 {
    128
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_chunk_size() -> usize {
    4000
}

fn default_chunk_delay_ms() -> u64 {
    40
}

fn default_send_buffer() -> usize {
    256
}

fn default_assets_dir() -> String {
    "assets/images".to_string()
}
