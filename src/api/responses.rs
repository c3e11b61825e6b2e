//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{services::DisplayView, state::TimerState};

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    /// Timer phase after the command: running, paused, idle or
    /// awaiting-acknowledgement
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a response describing the timer after a command
    pub fn new(message: impl Into<String>, timer: TimerState) -> Self {
        Self {
            status: timer.phase().to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Full status: timer state, what the display shows, and server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub view: DisplayView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Result of acknowledging a completion alert
#[derive(Debug, Clone, Serialize)]
pub struct AcknowledgeResponse {
    /// The dismissed message, if one was showing
    pub acknowledged: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Timer after any held advance was applied
    pub timer: TimerState,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
