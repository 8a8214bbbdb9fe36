//! Device registry: role pools of live connections.
//!
//! One map holds every connection; pool membership is derived from the
//! role stored on the handle, so a connection is in exactly one pool by
//! construction and disconnect cleanup is a single removal.
//!
//! # Thread Safety
//!
//! Connect/disconnect callbacks and broadcasts arrive on arbitrary tokio
//! worker tasks. The map sits behind an `RwLock`; broadcasts take a
//! point-in-time snapshot and release the lock before sending, so slow
//! sends never block new connections. A device joining mid-broadcast may
//! miss that broadcast, and a device leaving mid-broadcast may see a
//! failed send; both are accepted behavior.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::domain::device::Role;

use super::messages::ServerFrame;

/// Unique identifier for a connected device, generated server-side at
/// handshake time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Creates a new random DeviceId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a DeviceId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Handle to one live connection.
///
/// The transport side owns the socket; the handle only carries the
/// classification result and the bounded outbound frame channel drained
/// by the connection's writer task.
pub struct DeviceHandle {
    id: DeviceId,
    role: Role,
    label: Option<String>,
    sender: mpsc::Sender<ServerFrame>,
}

impl DeviceHandle {
    pub fn new(role: Role, label: Option<String>, sender: mpsc::Sender<ServerFrame>) -> Self {
        Self {
            id: DeviceId::new(),
            role,
            label,
            sender,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Role assigned at classification. Immutable for the connection's
    /// lifetime.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Optional human-assigned label from the handshake query.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Attempt a non-blocking send to this device.
    ///
    /// Returns `false` when the writer task is gone or its buffer is full.
    /// Callers log and skip; they never remove the device (removal is
    /// driven by the transport's close signal only).
    pub fn send(&self, frame: ServerFrame) -> bool {
        self.sender.try_send(frame).is_ok()
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("label", &self.label)
            .finish()
    }
}

/// Registry of all live device connections, organized into role pools.
pub struct DeviceRegistry {
    devices: RwLock<HashMap<DeviceId, Arc<DeviceHandle>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// Add a freshly classified connection.
    pub async fn register(&self, handle: Arc<DeviceHandle>) {
        self.devices.write().await.insert(handle.id(), handle);
    }

    /// Remove a connection unconditionally.
    ///
    /// Safe to call for ids that were never registered (or were already
    /// removed); returns whether anything was removed.
    pub async fn deregister(&self, id: DeviceId) -> bool {
        self.devices.write().await.remove(&id).is_some()
    }

    /// Snapshot of the members of a role pool.
    ///
    /// `Unknown` connections are members of the edge-display pool.
    pub async fn pool_members(&self, pool: Role) -> Vec<Arc<DeviceHandle>> {
        let pool = pool.pool();
        self.devices
            .read()
            .await
            .values()
            .filter(|handle| handle.role().pool() == pool)
            .cloned()
            .collect()
    }

    /// Look up a single device by id.
    pub async fn find(&self, id: DeviceId) -> Option<Arc<DeviceHandle>> {
        self.devices.read().await.get(&id).cloned()
    }

    /// Snapshot of every connected device (diagnostics).
    pub async fn devices(&self) -> Vec<Arc<DeviceHandle>> {
        self.devices.read().await.values().cloned().collect()
    }

    /// Number of members in a role pool.
    pub async fn pool_count(&self, pool: Role) -> usize {
        self.pool_members(pool).await.len()
    }

    /// Total number of connected devices.
    pub async fn total(&self) -> usize {
        self.devices.read().await.len()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle_with_rx(
        role: Role,
        label: Option<&str>,
    ) -> (Arc<DeviceHandle>, mpsc::Receiver<ServerFrame>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = Arc::new(DeviceHandle::new(role, label.map(String::from), tx));
        (handle, rx)
    }

    #[tokio::test]
    async fn register_adds_to_exactly_one_pool() {
        let registry = DeviceRegistry::new();
        let (kitchen, _rx) = handle_with_rx(Role::KitchenDisplay, None);
        registry.register(kitchen).await;

        assert_eq!(registry.pool_count(Role::KitchenDisplay).await, 1);
        assert_eq!(registry.pool_count(Role::StaffApp).await, 0);
        assert_eq!(registry.pool_count(Role::EdgeDisplay).await, 0);
    }

    #[tokio::test]
    async fn unknown_devices_join_the_edge_pool() {
        let registry = DeviceRegistry::new();
        let (unknown, _rx) = handle_with_rx(Role::Unknown, None);
        let id = unknown.id();
        registry.register(unknown).await;

        assert_eq!(registry.pool_count(Role::EdgeDisplay).await, 1);
        // The stored role stays Unknown for diagnostics.
        assert_eq!(registry.find(id).await.unwrap().role(), Role::Unknown);
    }

    #[tokio::test]
    async fn deregister_removes_from_every_pool() {
        let registry = DeviceRegistry::new();
        let (edge, _rx1) = handle_with_rx(Role::EdgeDisplay, None);
        let (staff, _rx2) = handle_with_rx(Role::StaffApp, None);
        let edge_id = edge.id();
        registry.register(edge).await;
        registry.register(staff).await;

        assert!(registry.deregister(edge_id).await);
        assert_eq!(registry.total().await, 1);
        assert_eq!(registry.pool_count(Role::EdgeDisplay).await, 0);
        assert!(registry.find(edge_id).await.is_none());
    }

    #[tokio::test]
    async fn deregister_absent_id_is_a_noop() {
        let registry = DeviceRegistry::new();
        assert!(!registry.deregister(DeviceId::new()).await);
    }

    #[tokio::test]
    async fn deregister_is_safe_to_repeat() {
        let registry = DeviceRegistry::new();
        let (edge, _rx) = handle_with_rx(Role::EdgeDisplay, None);
        let id = edge.id();
        registry.register(edge).await;

        assert!(registry.deregister(id).await);
        assert!(!registry.deregister(id).await);
    }

    #[tokio::test]
    async fn pool_members_returns_a_snapshot() {
        let registry = Arc::new(DeviceRegistry::new());
        let (a, _rx1) = handle_with_rx(Role::EdgeDisplay, None);
        let (b, _rx2) = handle_with_rx(Role::EdgeDisplay, None);
        registry.register(a).await;
        registry.register(b.clone()).await;

        let snapshot = registry.pool_members(Role::EdgeDisplay).await;
        assert_eq!(snapshot.len(), 2);

        // Mutating after the snapshot does not affect it.
        registry.deregister(b.id()).await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.pool_count(Role::EdgeDisplay).await, 1);
    }

    #[tokio::test]
    async fn concurrent_connect_disconnect_and_iteration() {
        let registry = Arc::new(DeviceRegistry::new());

        let mut tasks = Vec::new();
        for i in 0..32 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let role = match i % 3 {
                    0 => Role::EdgeDisplay,
                    1 => Role::KitchenDisplay,
                    _ => Role::StaffApp,
                };
                let (tx, _rx) = mpsc::channel(1);
                let handle = Arc::new(DeviceHandle::new(role, None, tx));
                let id = handle.id();
                registry.register(handle).await;
                let _ = registry.pool_members(role).await;
                if i % 2 == 0 {
                    registry.deregister(id).await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(registry.total().await, 16);
    }

    #[tokio::test]
    async fn send_fails_when_buffer_is_full_without_removal() {
        let registry = DeviceRegistry::new();
        let (tx, _rx) = mpsc::channel(1);
        let handle = Arc::new(DeviceHandle::new(Role::EdgeDisplay, None, tx));
        registry.register(handle.clone()).await;

        assert!(handle.send(ServerFrame::ReadyAck));
        // Buffer of one is now full; the next send fails but the device
        // stays registered.
        assert!(!handle.send(ServerFrame::ReadyAck));
        assert_eq!(registry.total().await, 1);
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(8);
        let handle = DeviceHandle::new(Role::EdgeDisplay, None, tx);
        drop(rx);
        assert!(!handle.send(ServerFrame::ReadyAck));
    }

    #[test]
    fn device_id_round_trips_through_display() {
        let id = DeviceId::new();
        let parsed: DeviceId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[tokio::test]
    async fn labels_are_preserved() {
        let (handle, _rx) = handle_with_rx(Role::EdgeDisplay, Some("Table-5"));
        assert_eq!(handle.label(), Some("Table-5"));
    }
}
