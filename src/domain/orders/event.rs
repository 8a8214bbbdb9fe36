//! Order-lifecycle events rendered for the device wire protocol.

/// An order-lifecycle event fanned out to kitchen and staff clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    /// A new order was placed at a table.
    Created { table: String, details: String },
    /// An existing order changed status.
    StatusChanged { table: String, status: String },
}

impl OrderEvent {
    /// Create a new-order event.
    pub fn created(table: impl Into<String>, details: impl Into<String>) -> Self {
        OrderEvent::Created {
            table: table.into(),
            details: details.into(),
        }
    }

    /// Create a status-change event.
    pub fn status_changed(table: impl Into<String>, status: impl Into<String>) -> Self {
        OrderEvent::StatusChanged {
            table: table.into(),
            status: status.into(),
        }
    }

    /// Render the pipe-delimited wire body (without the pool prefix).
    pub fn wire_body(&self) -> String {
        match self {
            OrderEvent::Created { table, details } => {
                format!("NEW_ORDER|{table}|{details}")
            }
            OrderEvent::StatusChanged { table, status } => {
                format!("ORDER_UPDATE|{table}|{status}")
            }
        }
    }
}
