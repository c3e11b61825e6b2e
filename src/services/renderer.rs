//! Rendering surface for the timer display

use std::sync::Arc;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::display::{session_count_text, ModeToggle, MusicToggle};

/// Outcome of asking the surface to acknowledge a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// The user dismissed the message before the call returned
    Acknowledged,
    /// The message is showing; the user has not dismissed it yet
    Pending,
}

/// Outbound display calls made by the controller.
///
/// Implementations must not fail; anything they cannot draw is dropped.
pub trait Renderer: Send {
    fn render_countdown(&mut self, text: &str);
    fn render_progress(&mut self, percent: f64);
    fn render_session_label(&mut self, name: &str);
    fn render_session_count(&mut self, completed: u32);
    fn set_page_title(&mut self, title: &str);
    fn set_mode_label(&mut self, toggle: &ModeToggle);
    fn set_music_toggle_label(&mut self, toggle: &MusicToggle);
    fn show_music_player(&mut self);
    fn hide_music_player(&mut self);
    /// Show Pause while running, Start otherwise
    fn set_controls(&mut self, running: bool);
    /// Tell the user a countdown finished. A blocking surface returns
    /// `Acknowledged` once the user dismisses it.
    fn acknowledge_completion(&mut self, message: &str) -> Acknowledgement;
    /// Remove a pending completion message
    fn dismiss_completion(&mut self) {}
}

/// The last rendered state of every display element
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayView {
    pub countdown: String,
    pub progress: f64,
    pub session_label: String,
    pub session_count: String,
    pub title: String,
    pub mode_toggle: ModeToggle,
    pub music_toggle: MusicToggle,
    pub music_player_visible: bool,
    /// What the embedded player frame currently points at
    pub music_player_src: Option<String>,
    pub start_visible: bool,
    pub pause_visible: bool,
    /// Completion message awaiting acknowledgement
    pub alert: Option<String>,
}

/// Shared handle the view is published through
pub type ViewPublisher = Arc<watch::Sender<DisplayView>>;

/// Create a publisher holding an empty view
pub fn view_channel() -> ViewPublisher {
    let (view_tx, _) = watch::channel(DisplayView::default());
    Arc::new(view_tx)
}

/// Renderer that publishes every call into a shared [`DisplayView`]
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    view: ViewPublisher,
}

impl ViewRenderer {
    pub fn new(view: ViewPublisher) -> Self {
        Self { view }
    }

    fn update(&self, updater: impl FnOnce(&mut DisplayView)) {
        self.view.send_modify(updater);
    }
}

impl Renderer for ViewRenderer {
    fn render_countdown(&mut self, text: &str) {
        self.update(|v| v.countdown = text.to_string());
    }

    fn render_progress(&mut self, percent: f64) {
        self.update(|v| v.progress = percent);
    }

    fn render_session_label(&mut self, name: &str) {
        self.update(|v| v.session_label = name.to_string());
    }

    fn render_session_count(&mut self, completed: u32) {
        self.update(|v| v.session_count = session_count_text(completed));
    }

    fn set_page_title(&mut self, title: &str) {
        self.update(|v| {
            if v.title != title {
                debug!("Title: {}", title);
                v.title = title.to_string();
            }
        });
    }

    fn set_mode_label(&mut self, toggle: &ModeToggle) {
        self.update(|v| v.mode_toggle = toggle.clone());
    }

    fn set_music_toggle_label(&mut self, toggle: &MusicToggle) {
        self.update(|v| v.music_toggle = toggle.clone());
    }

    fn show_music_player(&mut self) {
        self.update(|v| v.music_player_visible = true);
    }

    fn hide_music_player(&mut self) {
        self.update(|v| v.music_player_visible = false);
    }

    fn set_controls(&mut self, running: bool) {
        self.update(|v| {
            v.start_visible = !running;
            v.pause_visible = running;
        });
    }

    fn acknowledge_completion(&mut self, message: &str) -> Acknowledgement {
        // The HTTP surface cannot block; the message stays up until dismissed
        info!("{}", message);
        self.update(|v| v.alert = Some(message.to_string()));
        Acknowledgement::Pending
    }

    fn dismiss_completion(&mut self) {
        self.update(|v| {
            if let Some(message) = v.alert.take() {
                debug!("Alert dismissed: {}", message);
            }
        });
    }
}
