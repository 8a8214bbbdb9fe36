//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Display canvas dimensions must be non-zero")]
    InvalidCanvas,

    #[error("JPEG quality must be between 1 and 100")]
    InvalidQuality,

    #[error("Chunk size must be non-zero")]
    InvalidChunkSize,

    #[error("Send buffer capacity must be non-zero")]
    InvalidSendBuffer,
}
