//! Inbound device messages, decoded once at the transport boundary.
//!
//! Display firmware speaks a tiny fixed vocabulary. Decoding it into a
//! tagged enum here keeps the connection loop to an exhaustive match
//! instead of string comparisons scattered through the handler.

/// Liveness probe sent by display firmware after boot.
pub const READY_PROBE: &str = "ESP32 ready!";

/// Reply to the liveness probe.
pub const READY_REPLY: &str = "Server received: ESP32 ready!";

/// Acknowledgement that a full image was reassembled on the device.
pub const IMAGE_ACK: &str = "IMAGE_OK";

/// A text frame received from a connected device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Device liveness probe; answered with [`READY_REPLY`].
    Ready,
    /// Device confirmed image reception. Informational only; no
    /// retransmission is keyed on it.
    ImageAck,
    /// Anything else. Logged and ignored.
    Other(String),
}

impl InboundMessage {
    /// Decode a raw text frame.
    pub fn parse(text: &str) -> InboundMessage {
        if text == READY_PROBE {
            InboundMessage::Ready
        } else if text == IMAGE_ACK {
            InboundMessage::ImageAck
        } else {
            InboundMessage::Other(text.to_string())
        }
    }
}
