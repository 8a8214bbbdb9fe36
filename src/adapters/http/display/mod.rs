//! HTTP adapter for image pushes and registry diagnostics.

mod dto;
mod handlers;
mod routes;

pub use dto::{DeviceInfo, DevicesResponse, ErrorResponse, PushImageResponse, PushQuery};
pub use handlers::DisplayAppState;
pub use routes::display_routes;
