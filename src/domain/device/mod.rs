//! Device-facing protocol vocabulary: roles and inbound messages.

mod inbound;
mod role;

pub use inbound::{InboundMessage, IMAGE_ACK, READY_PROBE, READY_REPLY};
pub use role::{device_label, parse_query, Role, CLIENT_KIND_PARAMS, DEVICE_LABEL_PARAM};
