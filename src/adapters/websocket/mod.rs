//! WebSocket adapters for the device-facing real-time gateway.
//!
//! This module holds the one genuinely concurrent part of the system:
//! long-lived device connections, the shared registry they live in, and
//! the fanout logic that broadcasts to them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DeviceRegistry                         │
//! │  edge pool            kitchen pool         staff pool       │
//! │  ├── table-display-a  ├── kitchen-screen   ├── staff-phone  │
//! │  ├── table-display-b  └── ...              └── ...          │
//! │  └── (unclassified, pooled fail-open)                       │
//! └─────────────────────────────────────────────────────────────┘
//!          ▲ register/deregister            │ snapshot
//!          │                                ▼
//! ┌────────────────────┐          ┌────────────────────┐
//! │  handler            │          │  EventFanout       │
//! │  upgrade, classify, │          │  order notices,    │
//! │  read/write loops   │          │  paced image chunks│
//! └────────────────────┘          └────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - outbound wire frames (pipe-delimited text grammar)
//! - [`registry`] - device handles and role pools
//! - [`handler`] - axum WebSocket upgrade handler and connection loops
//! - [`fanout`] - best-effort delivery to role pools

pub mod fanout;
pub mod handler;
pub mod messages;
pub mod registry;

pub use fanout::{ChunkDeliveryReport, EventFanout, OrderNotifyReport};
pub use handler::{websocket_router, ws_handler, GatewayState};
pub use messages::ServerFrame;
pub use registry::{DeviceHandle, DeviceId, DeviceRegistry};
