//! Cadence Server Library
//!
//! Serves the track catalog and relays upstream audio through the same origin as the
//! player, so the player's signal analysis is not blocked by cross-origin rules.
//!
//! This library exposes the router and its components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::{routing::get, Router};
use cadence_catalog_client::CATALOG_PATH;
use cadence_core::locator::PROXY_PATH;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;

/// Build the HTTP router
pub fn create_router(app_state: AppState) -> Router {
    // Paths are shared with the player-side crates so both ends agree
    Router::new()
        .route("/api/health", get(api::health::health))
        .route(CATALOG_PATH, get(api::musics::list_musics))
        .route(PROXY_PATH, get(api::proxy::proxy_audio))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
