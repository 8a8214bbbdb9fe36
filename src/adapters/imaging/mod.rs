//! Imaging adapters - transcoder implementations for the display pipeline.

mod jpeg_transcoder;

pub use jpeg_transcoder::JpegTranscoder;
