//! Embedded music player resource

use tracing::{debug, info};

use crate::error::PlayerError;
use super::renderer::ViewPublisher;

/// Source the frame is pointed at to stop playback
pub const BLANK_SOURCE: &str = "about:blank";

/// Opaque player the controller loads while visible and unloads when hidden.
/// Both operations are best-effort.
pub trait MusicPlayer: Send {
    fn load(&mut self, source: &str) -> Result<(), PlayerError>;
    fn unload(&mut self) -> Result<(), PlayerError>;
}

/// Player frame whose source is published alongside the display view
#[derive(Debug, Clone)]
pub struct EmbeddedPlayer {
    view: ViewPublisher,
}

impl EmbeddedPlayer {
    pub fn new(view: ViewPublisher) -> Self {
        Self { view }
    }
}

impl MusicPlayer for EmbeddedPlayer {
    fn load(&mut self, source: &str) -> Result<(), PlayerError> {
        if source.trim().is_empty() {
            return Err(PlayerError::Load {
                source_uri: source.to_string(),
                reason: "empty source".to_string(),
            });
        }

        info!("Loading music player source {}", source);
        self.view.send_modify(|v| v.music_player_src = Some(source.to_string()));
        Ok(())
    }

    fn unload(&mut self) -> Result<(), PlayerError> {
        debug!("Unloading music player");
        self.view.send_modify(|v| v.music_player_src = Some(BLANK_SOURCE.to_string()));
        Ok(())
    }
}
