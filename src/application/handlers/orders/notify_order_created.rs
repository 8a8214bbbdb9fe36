//! NotifyOrderCreatedHandler - announce a new order to kitchen and staff.

use std::sync::Arc;

use crate::adapters::websocket::{EventFanout, OrderNotifyReport};

/// Command describing a freshly created order.
#[derive(Debug, Clone)]
pub struct NotifyOrderCreatedCommand {
    /// Human-facing table label, e.g. `T5`.
    pub table: String,
    /// Short order summary, e.g. `Order #42`.
    pub details: String,
}

/// Handler invoked by the order service after an order is persisted.
///
/// Delivery is best effort; the report carries recipient counts and zero
/// recipients is a success.
pub struct NotifyOrderCreatedHandler {
    fanout: Arc<EventFanout>,
}

impl NotifyOrderCreatedHandler {
    pub fn new(fanout: Arc<EventFanout>) -> Self {
        Self { fanout }
    }

    pub async fn handle(&self, command: NotifyOrderCreatedCommand) -> OrderNotifyReport {
        self.fanout
            .notify_order_created(&command.table, &command.details)
            .await
    }
}
