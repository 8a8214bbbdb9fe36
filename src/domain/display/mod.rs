//! Display-push protocol: letterbox geometry and the chunked transfer codec.

mod chunk;
mod geometry;

pub use chunk::{chunk_payload, ChunkAssembler, ImageChunk, CHUNK_FRAME_TAG};
pub use geometry::{CanvasSize, FitBox};
