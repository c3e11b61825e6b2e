//! Session controller: the timer's state machine
//!
//! All mutation of [`TimerState`] goes through the commands and the tick
//! handler defined here. Rendering, sound, the music player and the tick
//! source are injected collaborators, so the transitions can be driven
//! deterministically without any of them being real.

use tracing::{debug, info, warn};

use super::{
    display::{completion_message, DisplaySnapshot, ModeToggle, MusicToggle},
    timer_state::{CompletionPolicy, Mode, Session, TimerSettings, TimerState},
};
use crate::{
    services::{Acknowledgement, MusicPlayer, Notifier, Renderer},
    tasks::TickSource,
};

/// External collaborators a controller drives
pub struct Collaborators {
    pub ticker: Box<dyn TickSource>,
    pub renderer: Box<dyn Renderer>,
    pub notifier: Box<dyn Notifier>,
    pub player: Box<dyn MusicPlayer>,
}

/// Emitted by the tick that brings a countdown to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCompleted {
    /// Session that just finished
    pub session: Session,
    /// Mode the timer is in afterwards
    pub next_mode: Mode,
    pub completed_work_sessions: u32,
    /// The advance to `next_mode` waits for [`SessionController::acknowledge`]
    pub awaiting_acknowledgement: bool,
}

pub struct SessionController {
    settings: TimerSettings,
    state: TimerState,
    /// Generation of the most recently started tick stream
    generation: u64,
    ticking: bool,
    ticker: Box<dyn TickSource>,
    renderer: Box<dyn Renderer>,
    notifier: Box<dyn Notifier>,
    player: Box<dyn MusicPlayer>,
}

fn next_mode_after(finished: Session) -> Mode {
    match finished {
        Session::Work => Mode::Rest,
        Session::ShortBreak | Session::LongBreak => Mode::Work,
    }
}

impl SessionController {
    /// Create an idle work-mode controller and render its initial state
    pub fn new(settings: TimerSettings, collaborators: Collaborators) -> Self {
        let Collaborators { ticker, renderer, notifier, player } = collaborators;
        let mut controller = Self {
            state: TimerState::new(&settings),
            settings,
            generation: 0,
            ticking: false,
            ticker,
            renderer,
            notifier,
            player,
        };

        controller.renderer.set_controls(false);
        controller.update_display();
        controller.update_mode_label();
        controller.update_music_toggle();
        controller.update_music_player();
        controller
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Whether a tick stream is currently active
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// Start a fresh countdown, or resume a paused one
    pub fn start(&mut self) {
        if self.blocked_by_acknowledgement("start") {
            return;
        }
        self.cancel_ticks();

        if !self.state.paused {
            self.state.restore_base(&self.settings);
        }

        let resumed = self.state.paused;
        self.state.running = true;
        self.state.paused = false;
        self.state.has_active_clock = true;

        info!(
            "{} {} with {}s remaining",
            if resumed { "Resuming" } else { "Starting" },
            self.state.session.label(),
            self.state.remaining_seconds
        );

        self.renderer.set_controls(true);
        self.update_display();
        self.update_music_player();
        self.begin_ticks();
    }

    /// Pause a running countdown. Does nothing unless running.
    pub fn pause(&mut self) {
        if self.blocked_by_acknowledgement("pause") {
            return;
        }
        if !self.state.running {
            debug!("Pause ignored, timer is not running");
            return;
        }

        self.cancel_ticks();
        self.state.paused = true;
        self.state.running = false;
        info!("Paused with {}s remaining", self.state.remaining_seconds);

        self.renderer.set_controls(false);
        self.update_display();
        self.update_music_player();
    }

    /// Stop and restore the current mode's full duration
    pub fn reset(&mut self) {
        if self.blocked_by_acknowledgement("reset") {
            return;
        }
        self.cancel_ticks();
        self.state.running = false;
        self.state.paused = false;
        self.state.has_active_clock = false;
        self.state.restore_base(&self.settings);
        info!("Timer reset to {}", self.state.session.label());

        self.renderer.set_controls(false);
        self.update_display();
        self.update_music_player();
    }

    /// Extend the countdown in any state. Also marks the clock active,
    /// so the title shows the countdown even if never started.
    pub fn add_time(&mut self, seconds: u64) {
        if self.blocked_by_acknowledgement("add time") {
            return;
        }
        self.state.extend(seconds);
        if !self.state.has_active_clock {
            self.state.has_active_clock = true;
        }
        info!(
            "Added {}s, {}s of {}s remaining",
            seconds, self.state.remaining_seconds, self.state.total_seconds
        );

        self.update_display();
    }

    /// Flip between work and rest, discarding the current countdown.
    /// A paused flag survives the switch, so the next start resumes with
    /// whatever the new mode holds by then.
    pub fn switch_mode(&mut self) {
        if self.blocked_by_acknowledgement("switch mode") {
            return;
        }
        if self.state.running {
            self.stop_for_switch();
        }

        self.state.mode = self.state.mode.toggled();
        self.state.restore_base(&self.settings);
        self.state.has_active_clock = false;
        info!("Switched to {:?} mode", self.state.mode);

        self.update_mode_label();
        self.update_display();
        self.update_music_player();
    }

    pub fn toggle_music_mode(&mut self) {
        if self.blocked_by_acknowledgement("toggle music") {
            return;
        }
        self.state.music_mode_enabled = !self.state.music_mode_enabled;
        info!(
            "Music mode {}",
            if self.state.music_mode_enabled { "enabled" } else { "disabled" }
        );

        self.update_music_toggle();
        self.update_music_player();
    }

    /// Dismiss the completion message and apply the advance it was holding
    /// back. Returns whether an advance was applied.
    pub fn acknowledge(&mut self) -> bool {
        self.renderer.dismiss_completion();
        if !self.state.awaiting_acknowledgement {
            debug!("Nothing awaiting acknowledgement");
            return false;
        }

        self.state.awaiting_acknowledgement = false;
        let finished = self.state.session;
        self.advance_after(finished);
        true
    }

    /// Advance the countdown by one second. Ticks while not running are ignored.
    pub fn tick(&mut self) -> Option<SessionCompleted> {
        if !self.state.running {
            debug!("Ignoring tick while not running");
            return None;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds == 0 {
            // Completion does its own rendering from here
            return Some(self.complete_session());
        }

        self.update_display();
        None
    }

    /// Deliver a tick from the stream tagged `generation`, dropping stale ones
    pub fn handle_tick(&mut self, generation: u64) -> Option<SessionCompleted> {
        if !self.ticking || generation != self.generation {
            debug!(
                "Dropping stale tick from stream {} (current {})",
                generation, self.generation
            );
            return None;
        }
        self.tick()
    }

    fn complete_session(&mut self) -> SessionCompleted {
        self.cancel_ticks();
        self.state.running = false;
        self.state.paused = false;
        self.state.has_active_clock = false;
        self.renderer.set_controls(false);

        if let Err(e) = self.notifier.play_notification() {
            warn!("Notification sound failed: {}", e);
        }

        let finished = self.state.session;
        if finished == Session::Work {
            self.state.completed_work_sessions += 1;
        }
        info!(
            "{} complete, {} work sessions completed",
            finished.label(),
            self.state.completed_work_sessions
        );

        let message = completion_message(finished);
        match self.settings.completion_policy {
            CompletionPolicy::AutoAdvance => {
                self.update_display();
                match self.renderer.acknowledge_completion(&message) {
                    Acknowledgement::Acknowledged => self.advance_after(finished),
                    Acknowledgement::Pending => {
                        info!("Holding at {} until acknowledged", finished.label());
                        self.state.awaiting_acknowledgement = true;
                        self.update_music_player();
                    }
                }
            }
            CompletionPolicy::StayAndNotify => {
                self.state.restore_base(&self.settings);
                self.update_display();
                self.renderer.acknowledge_completion(&message);
                self.update_music_player();
            }
        }

        SessionCompleted {
            session: finished,
            next_mode: match self.settings.completion_policy {
                CompletionPolicy::AutoAdvance => next_mode_after(finished),
                CompletionPolicy::StayAndNotify => self.state.mode,
            },
            completed_work_sessions: self.state.completed_work_sessions,
            awaiting_acknowledgement: self.state.awaiting_acknowledgement,
        }
    }

    fn advance_after(&mut self, finished: Session) {
        self.state.mode = next_mode_after(finished);
        self.state.restore_base(&self.settings);
        info!("Advanced to {}", self.state.session.label());

        self.update_mode_label();
        self.update_display();
        self.update_music_player();
    }

    fn blocked_by_acknowledgement(&self, command: &str) -> bool {
        if self.state.awaiting_acknowledgement {
            debug!("Ignoring {} until the completion is acknowledged", command);
        }
        self.state.awaiting_acknowledgement
    }

    fn stop_for_switch(&mut self) {
        self.cancel_ticks();
        self.state.running = false;
        self.state.paused = false;
    }

    fn begin_ticks(&mut self) {
        self.generation += 1;
        self.ticking = true;
        self.ticker.start(self.generation);
    }

    fn cancel_ticks(&mut self) {
        if self.ticking {
            self.ticker.cancel();
            self.ticking = false;
        }
    }

    fn update_display(&mut self) {
        let snapshot = DisplaySnapshot::of(&self.state);
        self.renderer.render_countdown(&snapshot.countdown);
        self.renderer.render_progress(snapshot.progress);
        self.renderer.render_session_label(snapshot.session_label);
        self.renderer.render_session_count(snapshot.completed_sessions);
        self.renderer.set_page_title(&snapshot.title);
    }

    fn update_mode_label(&mut self) {
        self.renderer.set_mode_label(&ModeToggle::for_mode(self.state.mode));
    }

    fn update_music_toggle(&mut self) {
        self.renderer
            .set_music_toggle_label(&MusicToggle::new(self.state.music_mode_enabled));
    }

    fn update_music_player(&mut self) {
        if self.state.music_player_visible() {
            self.renderer.show_music_player();
            if !self.state.music_player_loaded {
                if let Some(source) = self.settings.music_source.as_deref() {
                    match self.player.load(source) {
                        Ok(()) => self.state.music_player_loaded = true,
                        Err(e) => warn!("Music player load failed: {}", e),
                    }
                }
            }
        } else {
            self.renderer.hide_music_player();
            if self.state.music_player_loaded {
                if let Err(e) = self.player.unload() {
                    warn!("Music player unload failed: {}", e);
                }
                // Treated as unloaded either way; the next show reloads
                self.state.music_player_loaded = false;
            }
        }
    }
}
