//! Error types shared across the crate

use thiserror::Error;

/// Invalid timer configuration, rejected before the controller is built
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
}

/// Failure of the notification sound collaborator
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("failed to emit notification: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the embedded music player collaborator
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("music player could not load {source_uri}: {reason}")]
    Load { source_uri: String, reason: String },
    #[error("music player could not unload: {0}")]
    Unload(String),
}

/// Failure to reach the shared controller from the server side
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to lock {0}: lock poisoned")]
    LockPoisoned(&'static str),
}
