//! Pomodoro Timer - A work/rest interval timer with a local HTTP surface
//!
//! The core is [`state::SessionController`], a state machine over the timer's
//! mode, session and countdown. Rendering, sound, the embedded music player
//! and the tick source are injected collaborators, so the controller can be
//! driven deterministically in tests and by the HTTP server alike.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::{AppState, SessionController, TimerSettings, TimerState};
pub use utils::signals::shutdown_signal;
