//! Attendee presence polling.
//!
//! [`PresencePoller`] keeps a roster of [`AttendeeSnapshot`]s for one session,
//! refreshed from a [`RosterSource`] on a fixed interval. Each successful
//! cycle replaces the roster wholesale; an attendee missing from a response
//! has left. Join times survive only for attendees re-observed under the
//! same id.
//!
//! The next cycle is scheduled after the previous fetch settles, so fetches
//! never overlap however slow the source is.

mod demo;

pub use demo::DemoRosterSource;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lectern_api::{HttpEntityService, ServiceError};
use lectern_core::entities::{AttendeeObservation, AttendeeSnapshot};
use lectern_core::responses::RosterResponse;
use parking_lot::Mutex;
use tokio::sync::{Notify, watch};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Default refresh interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10_000);

/// Where roster observations come from.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_roster(
        &self,
        session_ref: &str,
    ) -> Result<Vec<AttendeeObservation>, ServiceError>;
}

#[async_trait]
impl RosterSource for HttpEntityService {
    async fn fetch_roster(
        &self,
        session_ref: &str,
    ) -> Result<Vec<AttendeeObservation>, ServiceError> {
        self.fetch_attendees(session_ref).await
    }
}

/// Roster as of the latest completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterView {
    /// Number of settled cycles, successful or not.
    pub cycle: u64,
    pub attendees: Vec<AttendeeSnapshot>,
    /// Time of the last successful refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Failure of the latest cycle only; cleared by the next success.
    pub last_error: Option<String>,
}

impl RosterView {
    /// Apply one cycle's outcome.
    fn apply(
        &mut self,
        outcome: Result<Vec<AttendeeObservation>, ServiceError>,
        now: DateTime<Utc>,
    ) {
        self.cycle += 1;
        match outcome {
            Ok(observations) => {
                let previous: HashMap<&str, Option<DateTime<Utc>>> = self
                    .attendees
                    .iter()
                    .map(|a| (a.id.as_str(), a.joined_at))
                    .collect();
                let attendees = observations
                    .into_iter()
                    .map(|obs| {
                        let joined_at = previous.get(obs.id.as_str()).copied().flatten();
                        AttendeeSnapshot::from_observation(obs, joined_at, now)
                    })
                    .collect();
                self.attendees = attendees;
                self.refreshed_at = Some(now);
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    #[must_use]
    pub fn online_count(&self) -> usize {
        self.attendees
            .iter()
            .filter(|a| a.presence.is_present())
            .count()
    }

    #[must_use]
    pub fn to_response(&self, session_id: &str) -> RosterResponse {
        RosterResponse {
            session_id: session_id.to_string(),
            cycle: self.cycle,
            refreshed_at: self.refreshed_at,
            attendees: self.attendees.clone(),
            error: self.last_error.clone(),
        }
    }
}

struct Running {
    session_ref: String,
    refresh: Arc<Notify>,
    /// Owned by this run's loop only; a cancelled loop never touches its successor's flag.
    fetching: Arc<AtomicBool>,
    _guard: DropGuard,
}

/// Periodic roster refresher for one session.
pub struct PresencePoller {
    source: Arc<dyn RosterSource>,
    roster: watch::Sender<RosterView>,
    running: Mutex<Option<Running>>,
}

impl PresencePoller {
    #[must_use]
    pub fn new(source: Arc<dyn RosterSource>) -> Self {
        let (roster, _) = watch::channel(RosterView::default());
        Self {
            source,
            roster,
            running: Mutex::new(None),
        }
    }

    /// Begin refreshing the roster of `session_ref` every `interval`.
    ///
    /// The first fetch starts immediately. Starting an already running
    /// poller restarts it for the new session with an empty roster.
    pub fn start(&self, session_ref: &str, interval: Duration) {
        self.stop();
        self.roster.send_replace(RosterView::default());

        let token = CancellationToken::new();
        let refresh = Arc::new(Notify::new());
        let fetching = Arc::new(AtomicBool::new(false));
        let cycle = PollLoop {
            source: Arc::clone(&self.source),
            roster: self.roster.clone(),
            fetching: Arc::clone(&fetching),
            refresh: Arc::clone(&refresh),
            cancelled: token.clone(),
            session_ref: session_ref.to_string(),
            interval,
        };
        tokio::spawn(cycle.run());
        tracing::debug!(session = session_ref, ?interval, "presence polling started");

        *self.running.lock() = Some(Running {
            session_ref: session_ref.to_string(),
            refresh,
            fetching,
            _guard: token.drop_guard(),
        });
    }

    /// Cancel polling. Safe to call repeatedly or before [`Self::start`].
    /// A fetch in flight is abandoned and its result discarded.
    pub fn stop(&self) {
        if let Some(running) = self.running.lock().take() {
            tracing::debug!(session = %running.session_ref, "presence polling stopped");
        }
    }

    /// Ask for a cycle now instead of waiting for the interval.
    ///
    /// Returns `false` (and does nothing) when the poller is stopped or a
    /// fetch is already in flight.
    pub fn refresh_now(&self) -> bool {
        let running = self.running.lock();
        match running.as_ref() {
            Some(running) if !running.fetching.load(Ordering::Acquire) => {
                running.refresh.notify_one();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|running| running.fetching.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn roster(&self) -> RosterView {
        self.roster.borrow().clone()
    }

    /// Receive every settled cycle.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RosterView> {
        self.roster.subscribe()
    }
}

impl Drop for PresencePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

struct PollLoop {
    source: Arc<dyn RosterSource>,
    roster: watch::Sender<RosterView>,
    fetching: Arc<AtomicBool>,
    refresh: Arc<Notify>,
    cancelled: CancellationToken,
    session_ref: String,
    interval: Duration,
}

impl PollLoop {
    async fn run(self) {
        loop {
            self.fetching.store(true, Ordering::Release);
            let outcome = tokio::select! {
                biased;
                () = self.cancelled.cancelled() => None,
                outcome = self.source.fetch_roster(&self.session_ref) => Some(outcome),
            };
            self.fetching.store(false, Ordering::Release);

            let Some(outcome) = outcome else { break };
            if self.cancelled.is_cancelled() {
                break;
            }
            if let Err(e) = &outcome {
                tracing::warn!(session = %self.session_ref, "roster refresh failed: {e}");
            }
            let now = Utc::now();
            self.roster.send_modify(|view| view.apply(outcome, now));
            tracing::debug!(
                session = %self.session_ref,
                cycle = self.roster.borrow().cycle,
                "roster refreshed"
            );

            tokio::select! {
                biased;
                () = self.cancelled.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
                () = self.refresh.notified() => {}
            }
        }
    }
}
