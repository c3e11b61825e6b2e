//! Background task delivering ticks to the session controller

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::state::AppState;

/// Receive tick generations and apply each one to the controller.
/// Runs until every tick sender is dropped.
pub async fn tick_pump_task(state: Arc<AppState>, mut tick_rx: mpsc::UnboundedReceiver<u64>) {
    info!("Starting tick pump task");

    while let Some(generation) = tick_rx.recv().await {
        match state.deliver_tick(generation) {
            Ok(Some(completed)) if completed.awaiting_acknowledgement => {
                info!(
                    "{} finished, {:?} follows once acknowledged",
                    completed.session.label(),
                    completed.next_mode
                );
            }
            Ok(Some(completed)) => {
                info!(
                    "{} finished, next mode {:?} ({} work sessions completed)",
                    completed.session.label(),
                    completed.next_mode,
                    completed.completed_work_sessions
                );
            }
            Ok(None) => {
                debug!("Tick {} applied", generation);
            }
            Err(e) => {
                error!("Failed to apply tick: {}", e);
            }
        }
    }

    info!("Tick channel closed, tick pump stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{view_channel, EmbeddedPlayer, SilentNotifier, ViewRenderer},
        state::{Collaborators, CompletionPolicy, Mode, SessionController, TimerSettings},
        tasks::IntervalTicker,
    };
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticks_drive_countdown_to_completion() {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let view = view_channel();
        let controller = SessionController::new(
            TimerSettings::new(3, 2, 10, CompletionPolicy::AutoAdvance).unwrap(),
            Collaborators {
                ticker: Box::new(IntervalTicker::new(tick_tx, Duration::from_secs(1))),
                renderer: Box::new(ViewRenderer::new(Arc::clone(&view))),
                notifier: Box::new(SilentNotifier),
                player: Box::new(EmbeddedPlayer::new(Arc::clone(&view))),
            },
        );
        let state = Arc::new(AppState::new(controller, view, 300, 0, "127.0.0.1".to_string()));
        tokio::spawn(tick_pump_task(Arc::clone(&state), tick_rx));

        state.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(state.get_timer_state().unwrap().remaining_seconds, 2);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let timer = state.get_timer_state().unwrap();
        assert_eq!(timer.completed_work_sessions, 1);
        assert_eq!(timer.mode, Mode::Work);
        assert!(timer.awaiting_acknowledgement);
        assert!(!timer.running);
        assert_eq!(
            state.get_view().alert.as_deref(),
            Some("Session complete! Work Session finished.")
        );

        // Completion cancelled the stream; the finished session holds at zero
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.get_timer_state().unwrap().remaining_seconds, 0);

        let (_, timer) = state.acknowledge().unwrap();
        assert_eq!(timer.mode, Mode::Rest);
        assert_eq!(timer.remaining_seconds, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_interval_countdown() {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let view = view_channel();
        let controller = SessionController::new(
            TimerSettings::default(),
            Collaborators {
                ticker: Box::new(IntervalTicker::new(tick_tx, Duration::from_secs(1))),
                renderer: Box::new(ViewRenderer::new(Arc::clone(&view))),
                notifier: Box::new(SilentNotifier),
                player: Box::new(EmbeddedPlayer::new(Arc::clone(&view))),
            },
        );
        let state = Arc::new(AppState::new(controller, view, 300, 0, "127.0.0.1".to_string()));
        tokio::spawn(tick_pump_task(Arc::clone(&state), tick_rx));

        state.start().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        state.pause().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let timer = state.get_timer_state().unwrap();
        assert_eq!(timer.remaining_seconds, 1498);
        assert!(timer.paused);
    }
}
