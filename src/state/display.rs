//! Pure display values derived from the timer state

use serde::{Deserialize, Serialize};

use super::timer_state::{Mode, Session, TimerState};

/// Tab title shown while no clock is active
pub const IDLE_TITLE: &str = "Pomodoro Timer";

/// Format seconds as zero-padded `MM:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed share of the current countdown, 0 to 100
pub fn progress_percent(state: &TimerState) -> f64 {
    if state.total_seconds == 0 {
        return 0.0;
    }
    let elapsed = state.total_seconds.saturating_sub(state.remaining_seconds);
    elapsed as f64 / state.total_seconds as f64 * 100.0
}

/// Page title: the countdown while a clock is active, otherwise static
pub fn page_title(state: &TimerState) -> String {
    if state.has_active_clock {
        format!("{} - {}", format_time(state.remaining_seconds), IDLE_TITLE)
    } else {
        IDLE_TITLE.to_string()
    }
}

pub fn session_count_text(completed: u32) -> String {
    format!("Completed sessions: {}", completed)
}

/// Message delivered when a countdown reaches zero
pub fn completion_message(session: Session) -> String {
    format!("Session complete! {} finished.", session.label())
}

/// Mode toggle control; it advertises the mode a click switches to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeToggle {
    pub target: Mode,
    pub label: String,
    pub aria_label: String,
    pub pressed: bool,
}

impl ModeToggle {
    pub fn for_mode(current: Mode) -> Self {
        let target = current.toggled();
        let name = match target {
            Mode::Work => "Work Mode",
            Mode::Rest => "Rest Mode",
        };
        Self {
            target,
            label: name.to_string(),
            aria_label: format!("Switch to {}", name),
            pressed: current == Mode::Rest,
        }
    }
}

impl Default for ModeToggle {
    fn default() -> Self {
        Self::for_mode(Mode::Work)
    }
}

/// Music toggle control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicToggle {
    pub active: bool,
    pub label: String,
    pub aria_label: String,
}

impl MusicToggle {
    pub fn new(active: bool) -> Self {
        let (label, aria_label) = if active {
            ("Music On", "Disable Music Mode")
        } else {
            ("Music Off", "Enable Music Mode")
        };
        Self {
            active,
            label: label.to_string(),
            aria_label: aria_label.to_string(),
        }
    }
}

impl Default for MusicToggle {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Everything a display update carries, computed in one pass
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    pub countdown: String,
    pub progress: f64,
    pub session_label: &'static str,
    pub completed_sessions: u32,
    pub title: String,
}

impl DisplaySnapshot {
    pub fn of(state: &TimerState) -> Self {
        Self {
            countdown: format_time(state.remaining_seconds),
            progress: progress_percent(state),
            session_label: state.session.label(),
            completed_sessions: state.completed_work_sessions,
            title: page_title(state),
        }
    }
}
