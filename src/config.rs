//! Configuration and CLI argument handling

use std::time::Duration;
use clap::{Parser, ValueEnum};

use crate::{
    error::SettingsError,
    state::{
        timer_state::{
            DEFAULT_ADD_TIME_SECONDS, DEFAULT_LONG_BREAK_SECONDS, DEFAULT_SHORT_BREAK_SECONDS,
            DEFAULT_WORK_SECONDS,
        },
        CompletionPolicy, TimerSettings,
    },
};

/// Completion behaviour as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompletionArg {
    /// Flip to the other mode after each countdown
    AutoAdvance,
    /// Restart the same session's duration without advancing
    Stay,
}

impl From<CompletionArg> for CompletionPolicy {
    fn from(arg: CompletionArg) -> Self {
        match arg {
            CompletionArg::AutoAdvance => CompletionPolicy::AutoAdvance,
            CompletionArg::Stay => CompletionPolicy::StayAndNotify,
        }
    }
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pomodoro-timer")]
#[command(about = "A work/rest interval timer served over a local HTTP surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work session duration in seconds
    #[arg(short, long, default_value_t = DEFAULT_WORK_SECONDS)]
    pub work: u64,

    /// Short break duration in seconds
    #[arg(short, long, default_value_t = DEFAULT_SHORT_BREAK_SECONDS)]
    pub short_break: u64,

    /// Long break duration in seconds
    #[arg(short, long, default_value_t = DEFAULT_LONG_BREAK_SECONDS)]
    pub long_break: u64,

    /// What happens when a countdown reaches zero
    #[arg(long, value_enum, default_value_t = CompletionArg::AutoAdvance)]
    pub completion: CompletionArg,

    /// Seconds added by the add-time command when no amount is given
    #[arg(long, default_value_t = DEFAULT_ADD_TIME_SECONDS)]
    pub add_time: u64,

    /// Source URI for the embedded music player
    #[arg(long)]
    pub music_src: Option<String>,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Validated timer settings
    pub fn timer_settings(&self) -> Result<TimerSettings, SettingsError> {
        let settings = TimerSettings::new(
            self.work,
            self.short_break,
            self.long_break,
            self.completion.into(),
        )?;

        Ok(match &self.music_src {
            Some(source) => settings.with_music_source(source.clone()),
            None => settings,
        })
    }

    /// Validated tick period
    pub fn tick_period(&self) -> Result<Duration, SettingsError> {
        if self.tick_ms == 0 {
            return Err(SettingsError::ZeroDuration { name: "tick period" });
        }
        Ok(Duration::from_millis(self.tick_ms))
    }

    /// Validated default add-time increment
    pub fn add_time_seconds(&self) -> Result<u64, SettingsError> {
        if self.add_time == 0 {
            return Err(SettingsError::ZeroDuration { name: "add-time increment" });
        }
        Ok(self.add_time)
    }
}
