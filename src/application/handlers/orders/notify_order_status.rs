//! NotifyOrderStatusHandler - announce an order status change.

use std::sync::Arc;

use crate::adapters::websocket::{EventFanout, OrderNotifyReport};

/// Command describing an order status transition.
#[derive(Debug, Clone)]
pub struct NotifyOrderStatusCommand {
    /// Human-facing table label, e.g. `T5`.
    pub table: String,
    /// New status token, e.g. `READY`.
    pub status: String,
}

/// Handler invoked by the order service after a status transition.
pub struct NotifyOrderStatusHandler {
    fanout: Arc<EventFanout>,
}

impl NotifyOrderStatusHandler {
    pub fn new(fanout: Arc<EventFanout>) -> Self {
        Self { fanout }
    }

    pub async fn handle(&self, command: NotifyOrderStatusCommand) -> OrderNotifyReport {
        self.fanout
            .notify_order_status(&command.table, &command.status)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::sync::mpsc;

    use crate::adapters::websocket::{DeviceHandle, DeviceRegistry, ServerFrame};
    use crate::domain::device::Role;

    #[tokio::test]
    async fn delivers_update_body_to_both_pools() {
        let registry = Arc::new(DeviceRegistry::new());

        let (kitchen_tx, mut kitchen_rx) = mpsc::channel::<ServerFrame>(8);
        registry
            .register(Arc::new(DeviceHandle::new(
                Role::KitchenDisplay,
                None,
                kitchen_tx,
            )))
            .await;
        let (staff_tx, mut staff_rx) = mpsc::channel::<ServerFrame>(8);
        registry
            .register(Arc::new(DeviceHandle::new(Role::StaffApp, None, staff_tx)))
            .await;

        let fanout = Arc::new(EventFanout::new(registry, Duration::from_millis(1)));
        let handler = NotifyOrderStatusHandler::new(fanout);

        let report = handler
            .handle(NotifyOrderStatusCommand {
                table: "T2".to_string(),
                status: "READY".to_string(),
            })
            .await;

        assert_eq!(report, OrderNotifyReport { kitchen: 1, staff: 1 });
        assert_eq!(
            kitchen_rx.try_recv().unwrap().to_string(),
            "KITCHEN:ORDER_UPDATE|T2|READY"
        );
        assert_eq!(
            staff_rx.try_recv().unwrap().to_string(),
            "STAFF:ORDER_UPDATE|T2|READY"
        );
    }
}
