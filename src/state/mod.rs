//! State management module
//!
//! This module contains the timer state, its derived display values and the
//! controller that owns every transition.

pub mod app_state;
pub mod controller;
pub mod display;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use controller::{Collaborators, SessionCompleted, SessionController};
pub use display::format_time;
pub use timer_state::{CompletionPolicy, Mode, Session, TimerSettings, TimerState};
