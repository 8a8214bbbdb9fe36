//! Axum router configuration for the display endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{list_devices, push_asset, push_image, DisplayAppState};

/// Create the display API router.
///
/// # Routes
/// - `POST /image` - broadcast raw image bytes to the edge pool
/// - `POST /images/:filename` - broadcast a named asset
/// - `GET /devices` - connected device diagnostics
///
/// Mount under `/api/display`:
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api/display", display_routes())
///     .with_state(display_state);
/// ```
pub fn display_routes() -> Router<DisplayAppState> {
    Router::new()
        .route("/image", post(push_image))
        .route("/images/:filename", post(push_asset))
        .route("/devices", get(list_devices))
}
