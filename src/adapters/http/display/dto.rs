//! Request/response DTOs for the display endpoints.

use serde::{Deserialize, Serialize};

/// Query parameters accepted by the push endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PushQuery {
    /// Target a single device id instead of the whole edge pool.
    pub device: Option<String>,
}

/// Successful push outcome.
#[derive(Debug, Serialize)]
pub struct PushImageResponse {
    pub message: String,
    pub chunks_total: usize,
    pub chunks_sent: usize,
    pub encoded_len: usize,
    pub recipients: usize,
}

/// One connected device, as reported by the diagnostics endpoint.
#[derive(Debug, Serialize)]
pub struct DeviceInfo {
    pub id: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Diagnostics listing of the registry.
#[derive(Debug, Serialize)]
pub struct DevicesResponse {
    pub total: usize,
    pub edge_displays: usize,
    pub kitchen_displays: usize,
    pub staff_apps: usize,
    pub devices: Vec<DeviceInfo>,
}

/// Standard error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
