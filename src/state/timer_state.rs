//! Timer state structure and configuration

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Default work session length in seconds (25 minutes)
pub const DEFAULT_WORK_SECONDS: u64 = 25 * 60;
/// Default short break length in seconds (5 minutes)
pub const DEFAULT_SHORT_BREAK_SECONDS: u64 = 5 * 60;
/// Default long break length in seconds (15 minutes)
pub const DEFAULT_LONG_BREAK_SECONDS: u64 = 15 * 60;
/// Default increment for the add-time command in seconds
pub const DEFAULT_ADD_TIME_SECONDS: u64 = 5 * 60;

/// Which duration family is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Work,
    Rest,
}

impl Mode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Mode::Work => Mode::Rest,
            Mode::Rest => Mode::Work,
        }
    }

    /// Session category a fresh countdown in this mode belongs to.
    /// Rest always maps to a short break.
    pub fn session(self) -> Session {
        match self {
            Mode::Work => Session::Work,
            Mode::Rest => Session::ShortBreak,
        }
    }
}

/// Display/label category of the current countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Session {
    Work,
    ShortBreak,
    /// Reserved; no transition produces it.
    LongBreak,
}

impl Session {
    /// Human readable session name
    pub fn label(self) -> &'static str {
        match self {
            Session::Work => "Work Session",
            Session::ShortBreak => "Short Break",
            Session::LongBreak => "Long Break",
        }
    }
}

/// What happens to mode and session when a countdown reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionPolicy {
    /// Acknowledge, then flip Work to Rest or a break back to Work
    #[default]
    AutoAdvance,
    /// Restore the current session's duration and notify without advancing
    StayAndNotify,
}

/// Durations and behaviour fixed for the lifetime of a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    pub work_duration: u64,
    pub short_break_duration: u64,
    pub long_break_duration: u64,
    pub completion_policy: CompletionPolicy,
    /// Source the embedded music player loads while visible
    pub music_source: Option<String>,
}

impl TimerSettings {
    /// Build settings, rejecting zero durations
    pub fn new(
        work_duration: u64,
        short_break_duration: u64,
        long_break_duration: u64,
        completion_policy: CompletionPolicy,
    ) -> Result<Self, SettingsError> {
        for (name, value) in [
            ("work duration", work_duration),
            ("short break duration", short_break_duration),
            ("long break duration", long_break_duration),
        ] {
            if value == 0 {
                return Err(SettingsError::ZeroDuration { name });
            }
        }

        Ok(Self {
            work_duration,
            short_break_duration,
            long_break_duration,
            completion_policy,
            music_source: None,
        })
    }

    /// Attach a music source for the embedded player
    pub fn with_music_source(mut self, source: impl Into<String>) -> Self {
        self.music_source = Some(source.into());
        self
    }

    /// Base duration of a fresh countdown in `mode`
    pub fn duration_for_mode(&self, mode: Mode) -> u64 {
        self.duration_for_session(mode.session())
    }

    /// Configured duration of `session`
    pub fn duration_for_session(&self, session: Session) -> u64 {
        match session {
            Session::Work => self.work_duration,
            Session::ShortBreak => self.short_break_duration,
            Session::LongBreak => self.long_break_duration,
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_SECONDS,
            short_break_duration: DEFAULT_SHORT_BREAK_SECONDS,
            long_break_duration: DEFAULT_LONG_BREAK_SECONDS,
            completion_policy: CompletionPolicy::default(),
            music_source: None,
        }
    }
}

/// The timer's mutable state, owned by a single controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: Mode,
    pub session: Session,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub running: bool,
    pub paused: bool,
    /// Started (or extended) and not yet reset or completed
    pub has_active_clock: bool,
    pub completed_work_sessions: u32,
    pub music_mode_enabled: bool,
    pub music_player_loaded: bool,
    /// A finished countdown is waiting for the user before advancing
    pub awaiting_acknowledgement: bool,
}

impl TimerState {
    /// Idle work-mode state with a full work countdown
    pub fn new(settings: &TimerSettings) -> Self {
        Self {
            mode: Mode::Work,
            session: Session::Work,
            remaining_seconds: settings.work_duration,
            total_seconds: settings.work_duration,
            running: false,
            paused: false,
            has_active_clock: false,
            completed_work_sessions: 0,
            music_mode_enabled: false,
            music_player_loaded: false,
            awaiting_acknowledgement: false,
        }
    }

    /// Restore the countdown to the base duration of the current mode,
    /// with the session mirroring the mode
    pub fn restore_base(&mut self, settings: &TimerSettings) {
        self.session = self.mode.session();
        self.remaining_seconds = settings.duration_for_mode(self.mode);
        self.total_seconds = self.remaining_seconds;
    }

    /// Extend both remaining and total time
    pub fn extend(&mut self, seconds: u64) {
        self.remaining_seconds = self.remaining_seconds.saturating_add(seconds);
        self.total_seconds = self.total_seconds.saturating_add(seconds);
    }

    /// Whether the embedded music player should be visible
    pub fn music_player_visible(&self) -> bool {
        self.music_mode_enabled && self.mode == Mode::Work
    }

    /// Coarse lifecycle name used in API responses
    pub fn phase(&self) -> &'static str {
        if self.awaiting_acknowledgement {
            "awaiting-acknowledgement"
        } else if self.running {
            "running"
        } else if self.paused {
            "paused"
        } else {
            "idle"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_durations_rejected() {
        assert_eq!(
            TimerSettings::new(0, 300, 900, CompletionPolicy::AutoAdvance),
            Err(SettingsError::ZeroDuration { name: "work duration" })
        );
        assert!(TimerSettings::new(1500, 0, 900, CompletionPolicy::AutoAdvance).is_err());
        assert!(TimerSettings::new(1500, 300, 0, CompletionPolicy::StayAndNotify).is_err());
    }

    #[test]
    fn test_rest_mode_maps_to_short_break() {
        let settings = TimerSettings::default();
        assert_eq!(Mode::Rest.session(), Session::ShortBreak);
        assert_eq!(settings.duration_for_mode(Mode::Rest), 300);
        assert_eq!(settings.duration_for_mode(Mode::Work), 1500);
        assert_eq!(settings.duration_for_session(Session::LongBreak), 900);
    }

    #[test]
    fn test_initial_state() {
        let state = TimerState::new(&TimerSettings::default());
        assert_eq!(state.mode, Mode::Work);
        assert_eq!(state.session, Session::Work);
        assert_eq!(state.remaining_seconds, 1500);
        assert_eq!(state.total_seconds, 1500);
        assert!(!state.running && !state.paused && !state.has_active_clock);
        assert!(!state.music_mode_enabled && !state.music_player_loaded);
        assert!(!state.awaiting_acknowledgement);
        assert_eq!(state.phase(), "idle");
    }

    #[test]
    fn test_phase_reports_awaiting_acknowledgement() {
        let mut state = TimerState::new(&TimerSettings::default());
        state.awaiting_acknowledgement = true;
        assert_eq!(state.phase(), "awaiting-acknowledgement");

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["awaitingAcknowledgement"], true);
    }

    #[test]
    fn test_restore_base_follows_mode() {
        let settings = TimerSettings::default();
        let mut state = TimerState::new(&settings);
        state.extend(600);
        state.mode = Mode::Rest;
        state.restore_base(&settings);
        assert_eq!(state.session, Session::ShortBreak);
        assert_eq!(state.remaining_seconds, 300);
        assert_eq!(state.total_seconds, 300);
    }

    #[test]
    fn test_serializes_camel_case() {
        let state = TimerState::new(&TimerSettings::default());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["mode"], "work");
        assert_eq!(json["session"], "work");
        assert_eq!(json["remainingSeconds"], 1500);
        assert_eq!(json["hasActiveClock"], false);

        let rest = serde_json::to_value(Session::ShortBreak).unwrap();
        assert_eq!(rest, "shortBreak");
    }
}
