//! WebSocket upgrade handler for device connections.
//!
//! Handles the HTTP upgrade and manages the connection lifecycle:
//! 1. Classify the role from the raw handshake query
//! 2. Upgrade to WebSocket and register the device
//! 3. Greet with `CONNECTED|<ROLE_TOKEN>`
//! 4. Writer task drains the outbound frame channel into the socket;
//!    reader loop dispatches decoded inbound messages
//! 5. Deregister on any close path, graceful or not

use std::sync::Arc;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        RawQuery, State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::domain::device::{device_label, InboundMessage, Role};

use super::messages::ServerFrame;
use super::registry::{DeviceHandle, DeviceRegistry};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct GatewayState {
    /// Registry shared with the fanout side.
    pub registry: Arc<DeviceRegistry>,
    /// Capacity of each connection's outbound frame channel.
    pub send_buffer: usize,
}

impl GatewayState {
    pub fn new(registry: Arc<DeviceRegistry>, send_buffer: usize) -> Self {
        Self {
            registry,
            send_buffer,
        }
    }
}

/// Create the router for the device WebSocket endpoints.
///
/// All three paths share one handler; the query parameter decides the
/// role. The per-population paths exist for device firmware that has them
/// baked in.
///
/// # Routes
/// - `GET /iot` - embedded table displays
/// - `GET /kitchen` - kitchen display screens
/// - `GET /staff` - staff apps
pub fn websocket_router() -> Router<GatewayState> {
    Router::new()
        .route("/iot", get(ws_handler))
        .route("/kitchen", get(ws_handler))
        .route("/staff", get(ws_handler))
}

/// Handle a WebSocket upgrade request.
///
/// Classification never rejects: an unrecognized or missing client-kind
/// parameter yields `Role::Unknown`, which is pooled with the edge
/// displays. Keeping a misconfigured display connected beats dropping it;
/// the mismatch stays visible in the logs and the handshake token.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    RawQuery(query): RawQuery,
    State(state): State<GatewayState>,
) -> Response {
    let query = query.unwrap_or_default();
    let role = Role::classify(&query);
    let label = device_label(&query);

    if role == Role::Unknown {
        warn!(query = %query, "unclassified client, defaulting to edge-display pool");
    }

    ws.on_upgrade(move |socket| handle_socket(socket, role, label, state))
}

/// Run one established connection to completion.
async fn handle_socket(socket: WebSocket, role: Role, label: Option<String>, state: GatewayState) {
    let (socket_tx, mut socket_rx) = socket.split();

    let (frame_tx, frame_rx) = mpsc::channel::<ServerFrame>(state.send_buffer);
    let handle = Arc::new(DeviceHandle::new(role, label, frame_tx));
    let device_id = handle.id();

    state.registry.register(handle.clone()).await;
    info!(%device_id, %role, label = handle.label().unwrap_or(""), "device connected");

    // The greeting goes through the frame channel so it cannot reorder
    // with frames fanned out immediately after registration.
    if !handle.send(ServerFrame::Connected(role)) {
        warn!(%device_id, "failed to queue handshake greeting");
    }

    let mut writer = tokio::spawn(write_frames(frame_rx, socket_tx, device_id));

    // Reader loop: decode inbound text once, dispatch exhaustively.
    while let Some(result) = socket_rx.next().await {
        match result {
            Ok(Message::Text(text)) => match InboundMessage::parse(&text) {
                InboundMessage::Ready => {
                    debug!(%device_id, "liveness probe received");
                    if !handle.send(ServerFrame::ReadyAck) {
                        warn!(%device_id, "failed to queue probe reply");
                    }
                }
                InboundMessage::ImageAck => {
                    debug!(%device_id, "device confirmed image reception");
                }
                InboundMessage::Other(other) => {
                    trace!(%device_id, message = %other, "ignoring unrecognized message");
                }
            },
            Ok(Message::Close(close)) => {
                log_close(device_id, close.as_ref());
                break;
            }
            Ok(Message::Binary(_)) => {
                warn!(%device_id, "ignoring unsupported binary message");
            }
            // Protocol ping/pong is answered by axum itself.
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(e) => {
                // Abnormal close: logged, then handled exactly like a
                // graceful one.
                warn!(%device_id, error = %e, "transport error, dropping connection");
                break;
            }
        }
    }

    // Unconditional cleanup for every close path.
    state.registry.deregister(device_id).await;
    writer.abort();
    let _ = (&mut writer).await;
    info!(%device_id, %role, "device disconnected");
}

/// Drain the outbound frame channel into the socket until either side
/// goes away.
async fn write_frames(
    mut frames: mpsc::Receiver<ServerFrame>,
    mut sink: SplitSink<WebSocket, Message>,
    device_id: super::registry::DeviceId,
) {
    while let Some(frame) = frames.recv().await {
        if let Err(e) = sink.send(Message::Text(frame.to_string())).await {
            debug!(%device_id, error = %e, "write failed, stopping writer");
            break;
        }
    }
}

fn log_close(device_id: super::registry::DeviceId, close: Option<&CloseFrame<'_>>) {
    match close {
        Some(frame) => info!(
            %device_id,
            code = frame.code,
            reason = %frame.reason,
            "device sent close frame"
        ),
        None => info!(%device_id, "device sent close frame"),
    }
}
