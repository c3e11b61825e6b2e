//! Completion notification sound

use std::{
    io::{self, Write},
    time::Duration,
};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::error::NotifyError;

/// One pulse of the completion alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmPulse {
    pub offset_ms: u64,
    pub frequency_hz: u32,
}

/// Three short pulses over half a second, alternating pitch
pub const ALARM_PATTERN: [AlarmPulse; 3] = [
    AlarmPulse { offset_ms: 0, frequency_hz: 800 },
    AlarmPulse { offset_ms: 150, frequency_hz: 1000 },
    AlarmPulse { offset_ms: 300, frequency_hz: 800 },
];

/// Fire-and-forget sound played when a countdown completes
pub trait Notifier: Send {
    fn play_notification(&mut self) -> Result<(), NotifyError>;
}

/// Rings the terminal bell once per alarm pulse
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl TerminalBell {
    fn ring(pulse: AlarmPulse) -> io::Result<()> {
        debug!("Alarm pulse at {}ms ({}Hz)", pulse.offset_ms, pulse.frequency_hz);
        let mut stderr = io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()
    }
}

impl Notifier for TerminalBell {
    fn play_notification(&mut self) -> Result<(), NotifyError> {
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async {
                    let start = tokio::time::Instant::now();
                    for pulse in ALARM_PATTERN {
                        tokio::time::sleep_until(start + Duration::from_millis(pulse.offset_ms)).await;
                        if let Err(e) = Self::ring(pulse) {
                            warn!("Alarm pulse failed: {}", e);
                            break;
                        }
                    }
                });
                Ok(())
            }
            // Without a runtime the pattern collapses to a single bell
            Err(_) => Self::ring(ALARM_PATTERN[0]).map_err(NotifyError::from),
        }
    }
}

/// Notifier used when sound is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn play_notification(&mut self) -> Result<(), NotifyError> {
        debug!("Notification sound muted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_pattern_fits_half_second() {
        assert!(ALARM_PATTERN.windows(2).all(|w| w[0].offset_ms < w[1].offset_ms));
        assert!(ALARM_PATTERN.iter().all(|p| p.offset_ms < 500));
        assert_ne!(ALARM_PATTERN[0].frequency_hz, ALARM_PATTERN[1].frequency_hz);
    }

    #[test]
    fn test_silent_notifier_succeeds() {
        assert!(SilentNotifier.play_notification().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_bell_returns_immediately_inside_runtime() {
        assert!(TerminalBell.play_notification().is_ok());
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
