//! HTTP handlers for the display endpoints.
//!
//! These connect axum routes to the application-layer push handler. The
//! push endpoints exist for operators and for the rest of the
//! floor-management system; device-facing traffic never goes through
//! HTTP, it lives on the WebSocket side.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use crate::adapters::websocket::{DeviceId, DeviceRegistry};
use crate::application::handlers::display::{
    PushImageCommand, PushImageError, PushImageHandler,
};

use super::dto::{DeviceInfo, DevicesResponse, ErrorResponse, PushImageResponse, PushQuery};

/// Shared state for the display endpoints.
#[derive(Clone)]
pub struct DisplayAppState {
    pub push_handler: Arc<PushImageHandler>,
    pub registry: Arc<DeviceRegistry>,
    /// Directory the named-asset endpoint loads images from.
    pub assets_dir: PathBuf,
}

/// `POST /image` - broadcast the request body as an image.
///
/// `422` when the bytes do not decode; in that case no chunk has been
/// sent to any device.
pub async fn push_image(
    State(state): State<DisplayAppState>,
    Query(query): Query<PushQuery>,
    body: Bytes,
) -> impl IntoResponse {
    let target = match parse_target(query.device.as_deref()) {
        Ok(target) => target,
        Err(response) => return response,
    };

    run_push(&state, body.to_vec(), target, "image broadcast to displays").await
}

/// `POST /images/:filename` - broadcast a named image from the assets
/// directory.
pub async fn push_asset(
    State(state): State<DisplayAppState>,
    Path(filename): Path<String>,
    Query(query): Query<PushQuery>,
) -> impl IntoResponse {
    let target = match parse_target(query.device.as_deref()) {
        Ok(target) => target,
        Err(response) => return response,
    };

    // Plain file names only; anything that climbs out of the assets
    // directory is rejected.
    if FsPath::new(&filename)
        .components()
        .any(|c| !matches!(c, std::path::Component::Normal(_)))
        || filename.contains('/')
        || filename.contains('\\')
    {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_FILENAME",
            "Filename must not contain path separators",
        );
    }

    let path = state.assets_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(filename = %filename, error = %e, "asset not readable");
            return error_response(
                StatusCode::NOT_FOUND,
                "ASSET_NOT_FOUND",
                format!("No such image asset: {filename}"),
            );
        }
    };

    run_push(
        &state,
        bytes,
        target,
        format!("image asset {filename} broadcast to displays"),
    )
    .await
}

/// `GET /devices` - diagnostics listing of connected devices.
pub async fn list_devices(State(state): State<DisplayAppState>) -> impl IntoResponse {
    use crate::domain::device::Role;

    let devices = state.registry.devices().await;
    let response = DevicesResponse {
        total: devices.len(),
        edge_displays: state.registry.pool_count(Role::EdgeDisplay).await,
        kitchen_displays: state.registry.pool_count(Role::KitchenDisplay).await,
        staff_apps: state.registry.pool_count(Role::StaffApp).await,
        devices: devices
            .iter()
            .map(|d| DeviceInfo {
                id: d.id().to_string(),
                role: d.role().wire_token().to_string(),
                label: d.label().map(String::from),
            })
            .collect(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

async fn run_push(
    state: &DisplayAppState,
    bytes: Vec<u8>,
    target: Option<DeviceId>,
    message: impl Into<String>,
) -> axum::response::Response {
    let command = PushImageCommand {
        bytes,
        target,
        cancel: None,
    };

    match state.push_handler.handle(command).await {
        Ok(report) => (
            StatusCode::OK,
            Json(PushImageResponse {
                message: message.into(),
                chunks_total: report.chunks_total,
                chunks_sent: report.chunks_sent,
                encoded_len: report.encoded_len,
                recipients: report.recipients,
            }),
        )
            .into_response(),
        Err(PushImageError::Transcode(e)) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "IMAGE_DECODE_FAILED",
            e.to_string(),
        ),
        Err(PushImageError::Worker(e)) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", e)
        }
    }
}

fn parse_target(device: Option<&str>) -> Result<Option<DeviceId>, axum::response::Response> {
    match device {
        None => Ok(None),
        Some(raw) => raw.parse::<DeviceId>().map(Some).map_err(|_| {
            error_response(
                StatusCode::BAD_REQUEST,
                "INVALID_DEVICE_ID",
                format!("Not a device id: {raw}"),
            )
        }),
    }
}

fn error_response(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> axum::response::Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}
