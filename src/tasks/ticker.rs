//! Cancellable tick sources driving the countdown

use std::{
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// A periodic signal the controller can start and cancel.
///
/// Every started stream is tagged with a generation; the controller ignores
/// ticks carrying any generation other than the one it started last.
pub trait TickSource: Send {
    /// Begin ticking, replacing any stream that is still active
    fn start(&mut self, generation: u64);
    /// Stop the active stream, if any
    fn cancel(&mut self);
}

/// Tokio-backed tick source that sends its generation over a channel once per period
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    tick_tx: mpsc::UnboundedSender<u64>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    pub fn new(tick_tx: mpsc::UnboundedSender<u64>, period: Duration) -> Self {
        Self {
            period,
            tick_tx,
            handle: None,
        }
    }

    /// Whether a tick task is currently scheduled
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self, generation: u64) {
        self.cancel();

        let tick_tx = self.tick_tx.clone();
        let period = self.period;
        // First tick lands one full period after start
        let first = Instant::now() + period;
        debug!("Starting tick stream {} every {:?}", generation, period);

        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(first, period);
            // A stalled runtime yields one late tick, never a catch-up burst
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick_tx.send(generation).is_err() {
                    debug!("Tick receiver closed, stopping tick stream {}", generation);
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Tick stream cancelled");
        }
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Default)]
struct TickLog {
    starts: AtomicUsize,
    cancels: AtomicUsize,
    // 0 means no active stream; generations start at 1
    active: AtomicU64,
}

/// Tick source that never fires on its own; callers drive `tick()` by hand.
/// Clones share the same log of starts and cancels.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    log: Arc<TickLog>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the active stream, if one is started
    pub fn active_generation(&self) -> Option<u64> {
        match self.log.active.load(Ordering::SeqCst) {
            0 => None,
            generation => Some(generation),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_generation().is_some()
    }

    pub fn starts(&self) -> usize {
        self.log.starts.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.log.cancels.load(Ordering::SeqCst)
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self, generation: u64) {
        self.log.starts.fetch_add(1, Ordering::SeqCst);
        self.log.active.store(generation, Ordering::SeqCst);
    }

    fn cancel(&mut self) {
        if self.log.active.swap(0, Ordering::SeqCst) != 0 {
            self.log.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_emits_generation_each_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::new(tx, Duration::from_secs(1));

        ticker.start(7);
        assert!(ticker.is_active());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let mut received = Vec::new();
        while let Ok(generation) = rx.try_recv() {
            received.push(generation);
        }
        assert_eq!(received, vec![7, 7, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::new(tx, Duration::from_secs(1));

        ticker.start(1);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        ticker.cancel();
        assert!(!ticker.is_active());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_restart_replaces_stream() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::new(tx, Duration::from_secs(1));

        ticker.start(1);
        ticker.start(2);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let mut received = Vec::new();
        while let Ok(generation) = rx.try_recv() {
            received.push(generation);
        }
        assert_eq!(received, vec![2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_skips_missed_ticks_after_stall() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::new(tx, Duration::from_secs(1));

        ticker.start(4);
        tokio::task::yield_now().await;

        // Jump past three deadlines without letting the tick task run
        tokio::time::advance(Duration::from_millis(3500)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 1);

        // The cadence restarts from the late tick
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(rx.try_recv().ok(), Some(4));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_manual_ticker_tracks_starts_and_cancels() {
        let shared = ManualTicker::new();
        let mut ticker = shared.clone();

        assert!(!shared.is_active());
        ticker.start(3);
        assert_eq!(shared.active_generation(), Some(3));

        ticker.cancel();
        ticker.cancel();
        assert!(!shared.is_active());
        assert_eq!(shared.starts(), 1);
        assert_eq!(shared.cancels(), 1);
    }
}
