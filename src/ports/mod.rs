//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application layer and the adapters that implement them.

mod transcoder;

pub use transcoder::{ImageTranscoder, TranscodeError};
