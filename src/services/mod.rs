//! External collaborator module
//!
//! This module contains the rendering surface, the notification sound and the
//! embedded music player the controller drives.

pub mod music;
pub mod notifier;
pub mod renderer;

// Re-export main types
pub use music::{EmbeddedPlayer, MusicPlayer};
pub use notifier::{Notifier, SilentNotifier, TerminalBell};
pub use renderer::{view_channel, Acknowledgement, DisplayView, Renderer, ViewPublisher, ViewRenderer};
