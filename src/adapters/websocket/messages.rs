//! Outbound wire frames for the device protocol.
//!
//! The device link is deliberately not JSON: display firmware parses a
//! handful of pipe-delimited text frames with a few hundred bytes of RAM.
//! Frames render through `Display` so the grammar lives in one place.
//!
//! # Grammar (UTF-8 text frames)
//!
//! - `CONNECTED|<ROLE_TOKEN>` - handshake completion
//! - `<POOL_PREFIX>:<body>` - event notice, e.g. `KITCHEN:NEW_ORDER|T5|...`
//! - `IMG|<seq>/<total>|<fragment>` - image chunk
//! - `Server received: ESP32 ready!` - liveness probe reply

use std::fmt;

use crate::domain::device::{Role, READY_REPLY};
use crate::domain::display::ImageChunk;

/// A text frame sent from the server to a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Handshake completion carrying the resolved role token.
    Connected(Role),
    /// Short event notice for one role pool.
    Notice { audience: Role, body: String },
    /// One fragment of a chunked image transfer.
    ImageChunk(ImageChunk),
    /// Reply to the device liveness probe.
    ReadyAck,
}

impl ServerFrame {
    /// Build a notice frame for a pool.
    pub fn notice(audience: Role, body: impl Into<String>) -> Self {
        ServerFrame::Notice {
            audience,
            body: body.into(),
        }
    }
}

impl fmt::Display for ServerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerFrame::Connected(role) => write!(f, "CONNECTED|{}", role.wire_token()),
            ServerFrame::Notice { audience, body } => {
                write!(f, "{}:{}", audience.pool().wire_token(), body)
            }
            ServerFrame::ImageChunk(chunk) => write!(f, "{chunk}"),
            ServerFrame::ReadyAck => f.write_str(READY_REPLY),
        }
    }
}
