//! Pomodoro Timer - A work/rest interval timer with a local HTTP surface
//!
//! This is the main entry point for the pomodoro-timer application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use pomodoro_timer::{
    api::create_router,
    config::Config,
    services::{view_channel, EmbeddedPlayer, Notifier, SilentNotifier, TerminalBell, ViewRenderer},
    state::{AppState, Collaborators, SessionController},
    tasks::{tick_pump_task, IntervalTicker},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_timer={},tower_http=info", config.log_level()))
        .init();

    let settings = config.timer_settings()?;
    let tick_period = config.tick_period()?;
    let add_time_seconds = config.add_time_seconds()?;

    info!("Starting pomodoro-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, work={}s, short break={}s, long break={}s, completion={:?}",
        config.host,
        config.port,
        settings.work_duration,
        settings.short_break_duration,
        settings.long_break_duration,
        settings.completion_policy
    );

    // Wire the controller to its collaborators
    let (tick_tx, tick_rx) = mpsc::unbounded_channel();
    let view = view_channel();
    let notifier: Box<dyn Notifier> = if config.no_sound {
        Box::new(SilentNotifier)
    } else {
        Box::new(TerminalBell)
    };
    let controller = SessionController::new(
        settings,
        Collaborators {
            ticker: Box::new(IntervalTicker::new(tick_tx, tick_period)),
            renderer: Box::new(ViewRenderer::new(Arc::clone(&view))),
            notifier,
            player: Box::new(EmbeddedPlayer::new(Arc::clone(&view))),
        },
    );

    let state = Arc::new(AppState::new(
        controller,
        view,
        add_time_seconds,
        config.port,
        config.host.clone(),
    ));

    // Feed ticks into the controller
    tokio::spawn(tick_pump_task(Arc::clone(&state), tick_rx));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start         - Start or resume the countdown");
    info!("  POST /pause         - Pause the countdown");
    info!("  POST /reset         - Reset to the current mode's duration");
    info!("  POST /add-time      - Add time (?seconds=N, default {}s)", add_time_seconds);
    info!("  POST /switch-mode   - Toggle work/rest mode");
    info!("  POST /toggle-music  - Toggle music mode");
    info!("  POST /acknowledge   - Dismiss the completion alert and advance");
    info!("  GET  /status        - Timer state and rendered display");
    info!("  GET  /health        - Health check");

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
