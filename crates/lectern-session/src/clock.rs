//! Elapsed-time clock for an in-progress session.
//!
//! The value is derived from a monotonic start instant rather than counted,
//! so a delayed tick can never make it drift. A ticker task republishes the
//! value once per second for subscribers; it is cancelled when the clock
//! freezes or the clock is dropped.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};

#[derive(Debug, Clone, Copy)]
enum ClockState {
    Idle,
    Running { since: Instant },
    Frozen { secs: u64 },
}

/// Whole-second counter that runs only while a session is in progress.
#[derive(Debug)]
pub struct ElapsedClock {
    state: Mutex<ClockState>,
    ticks: watch::Sender<u64>,
    ticker: Mutex<Option<DropGuard>>,
}

impl Default for ElapsedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ElapsedClock {
    #[must_use]
    pub fn new() -> Self {
        let (ticks, _) = watch::channel(0);
        Self {
            state: Mutex::new(ClockState::Idle),
            ticks,
            ticker: Mutex::new(None),
        }
    }

    /// Start counting from zero and spawn the ticker.
    ///
    /// Must be called from within a tokio runtime. Starting a running clock
    /// is a no-op.
    pub fn start(&self) {
        let mut state = self.state.lock();
        if matches!(*state, ClockState::Running { .. }) {
            return;
        }
        let since = Instant::now();
        *state = ClockState::Running { since };
        self.ticks.send_replace(0);

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let ticks = self.ticks.clone();
        tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticker = time::interval_at(since + period, period);
            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        ticks.send_replace(since.elapsed().as_secs());
                    }
                }
            }
        });
        *self.ticker.lock() = Some(token.drop_guard());
    }

    /// Stop counting and keep the last value. Freezing an idle or frozen
    /// clock changes nothing.
    pub fn freeze(&self) {
        let mut state = self.state.lock();
        if let ClockState::Running { since } = *state {
            let secs = since.elapsed().as_secs();
            *state = ClockState::Frozen { secs };
            self.ticks.send_replace(secs);
        }
        self.ticker.lock().take();
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        match *self.state.lock() {
            ClockState::Idle => 0,
            ClockState::Running { since } => since.elapsed().as_secs(),
            ClockState::Frozen { secs } => secs,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(*self.state.lock(), ClockState::Running { .. })
    }

    /// Receive the published value after every tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.ticks.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn counts_whole_seconds_while_running() {
        let clock = ElapsedClock::new();
        assert_eq!(clock.elapsed_secs(), 0);

        clock.start();
        time::advance(Duration::from_millis(5_400)).await;
        assert_eq!(clock.elapsed_secs(), 5);
        assert!(clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn freeze_keeps_last_value() {
        let clock = ElapsedClock::new();
        clock.start();
        time::advance(Duration::from_secs(5)).await;
        clock.freeze();

        time::advance(Duration::from_secs(30)).await;
        assert_eq!(clock.elapsed_secs(), 5);
        assert!(!clock.is_running());

        clock.freeze();
        assert_eq!(clock.elapsed_secs(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_each_second() {
        let clock = ElapsedClock::new();
        let mut rx = clock.subscribe();
        clock.start();

        let seen = rx.wait_for(|secs| *secs >= 3).await.map(|v| *v);
        assert_eq!(seen.ok(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn freezing_stops_the_ticker() {
        let clock = ElapsedClock::new();
        let mut rx = clock.subscribe();
        clock.start();
        time::advance(Duration::from_secs(2)).await;
        clock.freeze();
        rx.mark_unchanged();

        time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert!(!rx.has_changed().unwrap_or(true));
        assert_eq!(*rx.borrow(), 2);
    }
}
