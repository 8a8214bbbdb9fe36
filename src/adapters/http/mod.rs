//! HTTP adapters - REST surface for operators and the rest of the system.

pub mod display;
pub mod health;

// Re-export key types for convenience
pub use display::{display_routes, DisplayAppState};
pub use health::health_router;
