//! PushImageHandler - broadcast an image to the table displays.
//!
//! One call runs the whole pipeline: decode and letterbox on a blocking
//! thread, chunk the encoded frame, then pace the chunks out to the edge
//! pool. A decode failure aborts before any chunk exists, so corrupt
//! input never leaves partial image artifacts on a device.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapters::websocket::{DeviceId, EventFanout};
use crate::domain::display::{chunk_payload, CanvasSize};
use crate::ports::{ImageTranscoder, TranscodeError};

/// Command to broadcast one image.
#[derive(Debug)]
pub struct PushImageCommand {
    /// Raw encoded source bytes, any common raster format.
    pub bytes: Vec<u8>,
    /// Target a single device instead of the whole edge pool.
    pub target: Option<DeviceId>,
    /// Optional cancellation for the paced delivery phase.
    pub cancel: Option<CancellationToken>,
}

impl PushImageCommand {
    /// Broadcast to the whole edge pool.
    pub fn broadcast(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            target: None,
            cancel: None,
        }
    }
}

/// Outcome of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushImageReport {
    /// Length of the base64 stream the chunks were cut from.
    pub encoded_len: usize,
    /// Total chunks in the transfer.
    pub chunks_total: usize,
    /// Chunks actually delivered (less than the total only when cancelled).
    pub chunks_sent: usize,
    /// Devices in the target set when delivery started.
    pub recipients: usize,
}

/// Errors surfaced to the caller of a push.
#[derive(Debug, Error)]
pub enum PushImageError {
    /// The source bytes could not be transcoded. No chunk was sent.
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    /// The blocking transcode task died.
    #[error("transcode worker failed: {0}")]
    Worker(String),
}

/// Handler for image broadcasts to the embedded displays.
pub struct PushImageHandler {
    transcoder: Arc<dyn ImageTranscoder>,
    fanout: Arc<EventFanout>,
    canvas: CanvasSize,
    chunk_size: usize,
}

impl PushImageHandler {
    pub fn new(
        transcoder: Arc<dyn ImageTranscoder>,
        fanout: Arc<EventFanout>,
        canvas: CanvasSize,
        chunk_size: usize,
    ) -> Self {
        Self {
            transcoder,
            fanout,
            canvas,
            chunk_size,
        }
    }

    /// Run one image broadcast to completion.
    ///
    /// Returns only after every chunk has been processed, the transfer was
    /// cancelled, or decoding failed. Callers on a request path should
    /// expect the paced delivery to take `(chunks - 1) * pacing` delay.
    pub async fn handle(&self, command: PushImageCommand) -> Result<PushImageReport, PushImageError> {
        let PushImageCommand {
            bytes,
            target,
            cancel,
        } = command;

        // CPU-bound decode/scale/encode happens off the async runtime.
        let transcoder = self.transcoder.clone();
        let canvas = self.canvas;
        let frame = tokio::task::spawn_blocking(move || transcoder.transcode(&bytes, canvas))
            .await
            .map_err(|e| PushImageError::Worker(e.to_string()))??;

        let chunks = chunk_payload(&frame, self.chunk_size);
        let encoded_len = chunks.iter().map(|c| c.payload.len()).sum();
        let chunks_total = chunks.len();

        info!(
            frame_bytes = frame.len(),
            encoded_len, chunks_total, "image transcoded, starting delivery"
        );

        let delivery = self
            .fanout
            .deliver_chunks(chunks, target, cancel.as_ref())
            .await;

        Ok(PushImageReport {
            encoded_len,
            chunks_total,
            chunks_sent: delivery.frames_sent,
            recipients: delivery.recipients,
        })
    }
}
