//! Shared server state wrapping the single session controller

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{SessionCompleted, SessionController, TimerState};
use crate::{
    error::StateError,
    services::{DisplayView, ViewPublisher},
};

/// Main application state: one controller plus server metadata
pub struct AppState {
    /// The timer's state machine; every command and tick goes through this lock
    pub controller: Arc<Mutex<SessionController>>,
    /// Published rendering surface
    pub view: ViewPublisher,
    /// Increment used when add-time is requested without an amount
    pub default_add_seconds: u64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        controller: SessionController,
        view: ViewPublisher,
        default_add_seconds: u64,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            view,
            default_add_seconds,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run a user command against the controller and record it as the last action
    pub fn command<F>(&self, action: &str, command: F) -> Result<TimerState, StateError>
    where
        F: FnOnce(&mut SessionController),
    {
        let mut controller = self.controller.lock()
            .map_err(|_| StateError::LockPoisoned("session controller"))?;

        command(&mut *controller);
        let new_state = controller.state().clone();
        drop(controller);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        info!("Command {} applied, timer {}", action, new_state.phase());
        Ok(new_state)
    }

    pub fn start(&self) -> Result<TimerState, StateError> {
        self.command("start", |c| c.start())
    }

    pub fn pause(&self) -> Result<TimerState, StateError> {
        self.command("pause", |c| c.pause())
    }

    pub fn reset(&self) -> Result<TimerState, StateError> {
        self.command("reset", |c| c.reset())
    }

    /// Add `seconds`, or the configured default increment
    pub fn add_time(&self, seconds: Option<u64>) -> Result<TimerState, StateError> {
        let seconds = seconds.unwrap_or(self.default_add_seconds);
        self.command("add-time", |c| c.add_time(seconds))
    }

    pub fn switch_mode(&self) -> Result<TimerState, StateError> {
        self.command("switch-mode", |c| c.switch_mode())
    }

    pub fn toggle_music(&self) -> Result<TimerState, StateError> {
        self.command("toggle-music", |c| c.toggle_music_mode())
    }

    /// Deliver a tick from the stream tagged `generation`
    pub fn deliver_tick(&self, generation: u64) -> Result<Option<SessionCompleted>, StateError> {
        let mut controller = self.controller.lock()
            .map_err(|_| StateError::LockPoisoned("session controller"))?;
        Ok(controller.handle_tick(generation))
    }

    /// Dismiss the pending completion alert and apply the advance it holds.
    /// Returns the dismissed message, if one was showing.
    pub fn acknowledge(&self) -> Result<(Option<String>, TimerState), StateError> {
        let message = self.view.borrow().alert.clone();
        let timer = self.command("acknowledge", |c| {
            if c.acknowledge() {
                debug!("Completion acknowledged, advanced to {:?}", c.state().mode);
            }
        })?;
        Ok((message, timer))
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, StateError> {
        self.controller.lock()
            .map(|controller| controller.state().clone())
            .map_err(|_| StateError::LockPoisoned("session controller"))
    }

    /// Get the last rendered display
    pub fn get_view(&self) -> DisplayView {
        self.view.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs();
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let seconds = seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
