//! HTTP API module
//!
//! This module maps user commands onto endpoints and exposes the rendered
//! display through the status endpoint.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/add-time", post(add_time_handler))
        .route("/switch-mode", post(switch_mode_handler))
        .route("/toggle-music", post(toggle_music_handler))
        .route("/acknowledge", post(acknowledge_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
