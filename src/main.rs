//! Tablecast gateway binary.
//!
//! Wires the registry, fanout, and transcoding pipeline into an axum
//! server exposing the device WebSocket endpoints and the operator HTTP
//! surface.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tablecast::adapters::http::{display_routes, health_router, DisplayAppState};
use tablecast::adapters::imaging::JpegTranscoder;
use tablecast::adapters::websocket::{
    websocket_router, DeviceRegistry, EventFanout, GatewayState,
};
use tablecast::application::handlers::display::PushImageHandler;
use tablecast::config::AppConfig;
use tablecast::ports::ImageTranscoder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        environment = ?config.server.environment,
        canvas = %config.display.canvas(),
        "starting tablecast gateway"
    );

    // Shared registry, mutated by connection lifecycles and read by every
    // broadcast. Constructed once and injected; nothing here is global.
    let registry = Arc::new(DeviceRegistry::new());
    let fanout = Arc::new(EventFanout::new(
        registry.clone(),
        Duration::from_millis(config.display.chunk_delay_ms),
    ));
    let transcoder: Arc<dyn ImageTranscoder> =
        Arc::new(JpegTranscoder::new(config.display.jpeg_quality));
    let push_handler = Arc::new(PushImageHandler::new(
        transcoder,
        fanout,
        config.display.canvas(),
        config.display.chunk_size,
    ));

    let gateway_state = GatewayState::new(registry.clone(), config.display.send_buffer);
    let display_state = DisplayAppState {
        push_handler,
        registry,
        assets_dir: config.display.assets_dir.clone().into(),
    };

    // Timeout covers the HTTP surface only; device sockets are long-lived.
    let api = Router::new()
        .nest("/display", display_routes().with_state(display_state))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let app = Router::new()
        .nest("/ws", websocket_router().with_state(gateway_state))
        .nest("/api", api)
        .merge(health_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    info!(%addr, "tablecast gateway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the CORS layer from configuration.
///
/// Permissive when no origins are configured: displays and kitchen
/// screens connect from anywhere on the floor network.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
