//! Event fanout: best-effort delivery to role pools.
//!
//! Every delivery iterates a point-in-time snapshot of the target pool. A
//! send that fails (device gone, buffer full) is logged and skipped; it
//! never aborts delivery to the rest of the pool and never removes the
//! device. Removal is the transport's job, on its close signal.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::device::Role;
use crate::domain::display::ImageChunk;
use crate::domain::orders::OrderEvent;

use super::messages::ServerFrame;
use super::registry::{DeviceHandle, DeviceId, DeviceRegistry};

/// Recipient counts for a dual-pool order notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderNotifyReport {
    pub kitchen: usize,
    pub staff: usize,
}

/// Outcome of a paced chunk delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDeliveryReport {
    /// Frames actually stepped through (equals the transfer total unless
    /// cancelled).
    pub frames_sent: usize,
    /// Pool size observed when delivery started.
    pub recipients: usize,
}

/// Fans out text frames to role pools.
pub struct EventFanout {
    registry: Arc<DeviceRegistry>,
    /// Delay inserted between successive image-chunk frames so the
    /// device's receive buffer can drain.
    pacing: Duration,
}

impl EventFanout {
    pub fn new(registry: Arc<DeviceRegistry>, pacing: Duration) -> Self {
        Self { registry, pacing }
    }

    /// Deliver a notice body to every current member of one pool.
    ///
    /// Returns the number of devices that accepted the frame. Zero
    /// recipients is a silent success.
    pub async fn notify_pool(&self, pool: Role, body: &str) -> usize {
        let members = self.registry.pool_members(pool).await;
        let frame = ServerFrame::notice(pool, body);
        self.send_to_all(&members, &frame)
    }

    /// Announce a new order to the kitchen and staff pools.
    pub async fn notify_order_created(&self, table: &str, details: &str) -> OrderNotifyReport {
        self.notify_order(OrderEvent::created(table, details)).await
    }

    /// Announce an order status change to the kitchen and staff pools.
    pub async fn notify_order_status(&self, table: &str, status: &str) -> OrderNotifyReport {
        self.notify_order(OrderEvent::status_changed(table, status))
            .await
    }

    async fn notify_order(&self, event: OrderEvent) -> OrderNotifyReport {
        let body = event.wire_body();
        let report = OrderNotifyReport {
            kitchen: self.notify_pool(Role::KitchenDisplay, &body).await,
            staff: self.notify_pool(Role::StaffApp, &body).await,
        };
        info!(
            body = %body,
            kitchen = report.kitchen,
            staff = report.staff,
            "order event fanned out"
        );
        report
    }

    /// Deliver image chunks to the edge pool (or a single target device)
    /// in strictly increasing sequence order, pacing between frames.
    ///
    /// The pool is re-snapshotted per frame, so a device that disconnects
    /// mid-transfer stops receiving immediately. Cancellation stops the
    /// loop between frames; the report says how far delivery got.
    pub async fn deliver_chunks(
        &self,
        chunks: Vec<ImageChunk>,
        target: Option<DeviceId>,
        cancel: Option<&CancellationToken>,
    ) -> ChunkDeliveryReport {
        let total = chunks.len();
        let recipients = match target {
            Some(id) => usize::from(self.registry.find(id).await.is_some()),
            None => self.registry.pool_count(Role::EdgeDisplay).await,
        };

        let mut frames_sent = 0;
        for chunk in chunks {
            if cancel.is_some_and(|token| token.is_cancelled()) {
                warn!(frames_sent, total, "image delivery cancelled");
                break;
            }

            let members = match target {
                Some(id) => self.registry.find(id).await.into_iter().collect(),
                None => self.registry.pool_members(Role::EdgeDisplay).await,
            };
            let seq = chunk.seq;
            let frame = ServerFrame::ImageChunk(chunk);
            let delivered = self.send_to_all(&members, &frame);
            debug!(seq, total, delivered, "image chunk sent");

            frames_sent += 1;
            if frames_sent < total && !self.pause_between_frames(cancel).await {
                warn!(frames_sent, total, "image delivery cancelled");
                break;
            }
        }

        ChunkDeliveryReport {
            frames_sent,
            recipients,
        }
    }

    /// Send one frame to every member, skipping failures.
    fn send_to_all(&self, members: &[Arc<DeviceHandle>], frame: &ServerFrame) -> usize {
        let mut delivered = 0;
        for member in members {
            if member.send(frame.clone()) {
                delivered += 1;
            } else {
                warn!(
                    device_id = %member.id(),
                    role = %member.role(),
                    "failed to send frame to device, skipping"
                );
            }
        }
        delivered
    }

    /// Sleep the pacing delay; returns `false` if cancelled first.
    async fn pause_between_frames(&self, cancel: Option<&CancellationToken>) -> bool {
        match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(self.pacing) => true,
            },
            None => {
                tokio::time::sleep(self.pacing).await;
                true
            }
        }
    }
}
