//! ImageTranscoder port - turning arbitrary image bytes into display frames.

use thiserror::Error;

use crate::domain::display::CanvasSize;

/// Errors from the transcoding pipeline.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The source bytes are not a decodable raster image. This aborts the
    /// whole broadcast before any chunk is produced.
    #[error("source bytes are not a decodable image: {0}")]
    Decode(String),

    /// Re-encoding the letterboxed frame failed.
    #[error("encoding the display frame failed: {0}")]
    Encode(String),
}

/// Port for transcoding source image bytes into a compressed frame sized
/// for a fixed display canvas.
///
/// Implementations are synchronous: transcoding is CPU-bound, and callers
/// on the async runtime wrap the call in `spawn_blocking`.
pub trait ImageTranscoder: Send + Sync {
    /// Decode `source`, fit it into `canvas` with letterboxing, and return
    /// the re-encoded frame bytes.
    fn transcode(&self, source: &[u8], canvas: CanvasSize) -> Result<Vec<u8>, TranscodeError>;
}
