//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::error;

use crate::{
    error::StateError,
    state::{display::format_time, AppState, TimerState},
};
use super::responses::{AcknowledgeResponse, ApiResponse, HealthResponse, StatusResponse};

type CommandResult = Result<Json<ApiResponse>, StatusCode>;

/// Turn a command outcome into a JSON response, logging lock failures
fn respond(
    action: &str,
    result: Result<TimerState, StateError>,
    message: impl FnOnce(&TimerState) -> String,
) -> CommandResult {
    match result {
        Ok(timer) if timer.awaiting_acknowledgement => Ok(Json(ApiResponse::new(
            "Session complete, acknowledge to continue",
            timer,
        ))),
        Ok(timer) => Ok(Json(ApiResponse::new(message(&timer), timer))),
        Err(e) => {
            error!("Failed to {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    respond("start timer", state.start(), |t| {
        format!("{} running, {} remaining", t.session.label(), format_time(t.remaining_seconds))
    })
}

/// Handle POST /pause - Pause a running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    respond("pause timer", state.pause(), |t| {
        if t.paused {
            format!("Paused at {}", format_time(t.remaining_seconds))
        } else {
            "Timer is not running".to_string()
        }
    })
}

/// Handle POST /reset - Restore the current mode's duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    respond("reset timer", state.reset(), |t| {
        format!("Reset to {}", format_time(t.remaining_seconds))
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct AddTimeParams {
    pub seconds: Option<u64>,
}

/// Handle POST /add-time - Extend the countdown
pub async fn add_time_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddTimeParams>,
) -> CommandResult {
    respond("add time", state.add_time(params.seconds), |t| {
        format!("{} remaining of {}", format_time(t.remaining_seconds), format_time(t.total_seconds))
    })
}

/// Handle POST /switch-mode - Toggle between work and rest
pub async fn switch_mode_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    respond("switch mode", state.switch_mode(), |t| {
        format!("Switched to {}", t.session.label())
    })
}

/// Handle POST /toggle-music - Toggle music mode
pub async fn toggle_music_handler(State(state): State<Arc<AppState>>) -> CommandResult {
    respond("toggle music", state.toggle_music(), |t| {
        let label = if t.music_mode_enabled { "enabled" } else { "disabled" };
        format!("Music mode {}", label)
    })
}

/// Handle POST /acknowledge - Dismiss the completion alert and advance
pub async fn acknowledge_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AcknowledgeResponse>, StatusCode> {
    match state.acknowledge() {
        Ok((acknowledged, timer)) => Ok(Json(AcknowledgeResponse {
            acknowledged,
            timestamp: Utc::now(),
            timer,
        })),
        Err(e) => {
            error!("Failed to acknowledge completion: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the timer and its rendered display
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        view: state.get_view(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
