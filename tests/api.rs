use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use pomodoro_timer::{
    create_router,
    services::{view_channel, EmbeddedPlayer, SilentNotifier, ViewRenderer},
    state::{AppState, Collaborators, SessionController, TimerSettings},
    tasks::ManualTicker,
};

fn app(settings: TimerSettings) -> (Router, Arc<AppState>, ManualTicker) {
    let view = view_channel();
    let ticker = ManualTicker::new();
    let controller = SessionController::new(
        settings,
        Collaborators {
            ticker: Box::new(ticker.clone()),
            renderer: Box::new(ViewRenderer::new(Arc::clone(&view))),
            notifier: Box::new(SilentNotifier),
            player: Box::new(EmbeddedPlayer::new(Arc::clone(&view))),
        },
    );
    let state = Arc::new(AppState::new(controller, view, 300, 20554, "127.0.0.1".to_string()));
    (create_router(Arc::clone(&state)), state, ticker)
}

async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (router, _, _) = app(TimerSettings::default());
    let (status, body) = send(&router, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_initial_status_shows_idle_display() {
    let (router, _, _) = app(TimerSettings::default());
    let (status, body) = send(&router, Method::GET, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["mode"], "work");
    assert_eq!(body["timer"]["remainingSeconds"], 1500);
    assert_eq!(body["view"]["countdown"], "25:00");
    assert_eq!(body["view"]["title"], "Pomodoro Timer");
    assert_eq!(body["view"]["sessionLabel"], "Work Session");
    assert_eq!(body["view"]["sessionCount"], "Completed sessions: 0");
    assert_eq!(body["view"]["modeToggle"]["label"], "Rest Mode");
    assert_eq!(body["view"]["musicToggle"]["label"], "Music Off");
    assert_eq!(body["view"]["startVisible"], true);
    assert_eq!(body["view"]["pauseVisible"], false);
    assert!(body["last_action"].is_null());
}

#[tokio::test]
async fn test_start_pause_resume_cycle() {
    let (router, state, ticker) = app(TimerSettings::default());

    let (status, body) = send(&router, Method::POST, "/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["hasActiveClock"], true);

    let generation = ticker.active_generation().unwrap();
    for _ in 0..5 {
        state.deliver_tick(generation).unwrap();
    }

    let (_, body) = send(&router, Method::POST, "/pause").await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["remainingSeconds"], 1495);
    assert!(!ticker.is_active());

    let (_, body) = send(&router, Method::GET, "/status").await;
    assert_eq!(body["view"]["title"], "24:55 - Pomodoro Timer");
    assert_eq!(body["view"]["startVisible"], true);
    assert_eq!(body["last_action"], "pause");

    let (_, body) = send(&router, Method::POST, "/start").await;
    assert_eq!(body["timer"]["remainingSeconds"], 1495);
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn test_pause_while_idle_reports_not_running() {
    let (router, _, _) = app(TimerSettings::default());
    let (status, body) = send(&router, Method::POST, "/pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["message"], "Timer is not running");
}

#[tokio::test]
async fn test_add_time_default_and_explicit() {
    let (router, _, _) = app(TimerSettings::default());

    let (_, body) = send(&router, Method::POST, "/add-time").await;
    assert_eq!(body["timer"]["totalSeconds"], 1800);
    assert_eq!(body["timer"]["hasActiveClock"], true);
    assert_eq!(body["status"], "idle");

    let (_, body) = send(&router, Method::POST, "/add-time?seconds=60").await;
    assert_eq!(body["timer"]["totalSeconds"], 1860);
    assert_eq!(body["timer"]["remainingSeconds"], 1860);

    let (_, body) = send(&router, Method::POST, "/reset").await;
    assert_eq!(body["timer"]["totalSeconds"], 1500);
    assert_eq!(body["timer"]["hasActiveClock"], false);
}

#[tokio::test]
async fn test_switch_mode_and_music_visibility() {
    let settings = TimerSettings::default().with_music_source("https://example.com/focus");
    let (router, _, _) = app(settings);

    let (_, body) = send(&router, Method::POST, "/toggle-music").await;
    assert_eq!(body["message"], "Music mode enabled");

    let (_, status) = send(&router, Method::GET, "/status").await;
    assert_eq!(status["view"]["musicPlayerVisible"], true);
    assert_eq!(status["view"]["musicPlayerSrc"], "https://example.com/focus");

    let (_, body) = send(&router, Method::POST, "/switch-mode").await;
    assert_eq!(body["timer"]["mode"], "rest");
    assert_eq!(body["timer"]["session"], "shortBreak");
    assert_eq!(body["timer"]["remainingSeconds"], 300);

    let (_, status) = send(&router, Method::GET, "/status").await;
    assert_eq!(status["view"]["musicPlayerVisible"], false);
    assert_eq!(status["view"]["musicPlayerSrc"], "about:blank");
    assert_eq!(status["view"]["modeToggle"]["label"], "Work Mode");
    assert_eq!(status["view"]["sessionLabel"], "Short Break");
}

#[tokio::test]
async fn test_completion_waits_for_acknowledge() {
    let settings = TimerSettings::new(2, 1, 5, Default::default()).unwrap();
    let (router, state, ticker) = app(settings);

    send(&router, Method::POST, "/start").await;
    let generation = ticker.active_generation().unwrap();
    state.deliver_tick(generation).unwrap();
    let completed = state.deliver_tick(generation).unwrap();
    assert!(completed.is_some_and(|c| c.awaiting_acknowledgement));

    let (_, status) = send(&router, Method::GET, "/status").await;
    assert_eq!(status["timer"]["completedWorkSessions"], 1);
    assert_eq!(status["timer"]["mode"], "work");
    assert_eq!(status["timer"]["awaitingAcknowledgement"], true);
    assert_eq!(status["view"]["countdown"], "00:00");
    assert_eq!(status["view"]["alert"], "Session complete! Work Session finished.");
    assert_eq!(status["view"]["sessionCount"], "Completed sessions: 1");

    // Commands are held back until the alert is dismissed
    let (_, body) = send(&router, Method::POST, "/start").await;
    assert_eq!(body["status"], "awaiting-acknowledgement");
    assert_eq!(body["message"], "Session complete, acknowledge to continue");
    assert_eq!(body["timer"]["remainingSeconds"], 0);
    assert!(!ticker.is_active());

    let (status, body) = send(&router, Method::POST, "/acknowledge").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], "Session complete! Work Session finished.");
    assert_eq!(body["timer"]["mode"], "rest");
    assert_eq!(body["timer"]["remainingSeconds"], 1);
    assert_eq!(body["timer"]["awaitingAcknowledgement"], false);

    let (_, status) = send(&router, Method::GET, "/status").await;
    assert!(status["view"]["alert"].is_null());
    assert_eq!(status["view"]["countdown"], "00:01");
    assert_eq!(status["view"]["sessionLabel"], "Short Break");
    assert_eq!(status["last_action"], "acknowledge");

    let (_, body) = send(&router, Method::POST, "/acknowledge").await;
    assert!(body["acknowledged"].is_null());
    assert_eq!(body["timer"]["mode"], "rest");
}
