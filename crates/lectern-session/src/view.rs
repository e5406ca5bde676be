//! One open session: its lifecycle controller and the presence poller that
//! follows it.
//!
//! Polling is tied to the session: it cannot start for a completed or
//! cancelled session, and it stops as soon as the session reaches a terminal
//! state (through this view or directly through [`LiveSessionView::controller`]),
//! when the view is closed, or when the view is dropped.

use std::sync::Arc;
use std::time::Duration;

use lectern_core::enums::LifecycleState;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::SessionError;
use crate::lifecycle::{EndConfirmation, SessionLifecycleController};
use crate::presence::{DEFAULT_INTERVAL, PresencePoller, RosterSource, RosterView};

/// A session controller composed with its attendee roster.
pub struct LiveSessionView {
    controller: SessionLifecycleController,
    poller: Arc<PresencePoller>,
    interval: Duration,
    _follow: DropGuard,
}

impl LiveSessionView {
    /// Compose `controller` with a poller over `source`, refreshing every
    /// [`DEFAULT_INTERVAL`]. Polling does not begin until
    /// [`Self::start_presence`].
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn new(controller: SessionLifecycleController, source: Arc<dyn RosterSource>) -> Self {
        let poller = Arc::new(PresencePoller::new(source));
        let token = CancellationToken::new();
        tokio::spawn(stop_on_terminal(
            controller.subscribe_state(),
            Arc::clone(&poller),
            token.clone(),
        ));
        Self {
            controller,
            poller,
            interval: DEFAULT_INTERVAL,
            _follow: token.drop_guard(),
        }
    }

    /// Refresh the roster every `interval` instead of the default.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn controller(&self) -> &SessionLifecycleController {
        &self.controller
    }

    /// Begin polling the roster of this session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Closed`] after [`Self::close`], or
    /// [`SessionError::InvalidOperation`] when the session is already
    /// completed or cancelled.
    pub fn start_presence(&self) -> Result<(), SessionError> {
        if self.controller.is_closed() {
            return Err(SessionError::Closed);
        }
        let session = self.controller.session();
        if session.lifecycle_state.is_terminal() {
            return Err(SessionError::InvalidOperation {
                operation: "poll presence",
                state: session.lifecycle_state,
            });
        }
        self.poller.start(&session.id, self.interval);
        Ok(())
    }

    pub fn stop_presence(&self) {
        self.poller.stop();
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Ask for a roster refresh now; `false` when not polling or mid-fetch.
    pub fn refresh_presence(&self) -> bool {
        self.poller.refresh_now()
    }

    #[must_use]
    pub fn roster(&self) -> RosterView {
        self.poller.roster()
    }

    #[must_use]
    pub fn subscribe_roster(&self) -> watch::Receiver<RosterView> {
        self.poller.subscribe()
    }

    /// Start the session and its roster polling.
    ///
    /// # Errors
    ///
    /// As [`SessionLifecycleController::start`].
    pub async fn start(&self) -> Result<LifecycleState, SessionError> {
        let state = self.controller.start().await?;
        if !self.poller.is_running() {
            self.start_presence()?;
        }
        Ok(state)
    }

    /// End the session; polling stops once the backend acknowledges.
    ///
    /// # Errors
    ///
    /// As [`SessionLifecycleController::end`].
    pub async fn end(&self, confirmation: EndConfirmation) -> Result<LifecycleState, SessionError> {
        let result = self.controller.end(confirmation).await;
        self.stop_if_terminal();
        result
    }

    /// Cancel the session; polling stops once the backend acknowledges.
    ///
    /// # Errors
    ///
    /// As [`SessionLifecycleController::cancel`].
    pub async fn cancel(&self, reason: &str) -> Result<LifecycleState, SessionError> {
        let result = self.controller.cancel(reason).await;
        self.stop_if_terminal();
        result
    }

    /// Tear down polling and the controller. Idempotent.
    pub fn close(&self) {
        self.poller.stop();
        self.controller.close();
    }

    fn stop_if_terminal(&self) {
        if self.controller.state().is_terminal() {
            self.poller.stop();
        }
    }
}

impl Drop for LiveSessionView {
    fn drop(&mut self) {
        self.close();
    }
}

/// Stop `poller` once the session reaches a terminal state, whoever issued
/// the transition.
async fn stop_on_terminal(
    mut states: watch::Receiver<LifecycleState>,
    poller: Arc<PresencePoller>,
    cancelled: CancellationToken,
) {
    let terminal = tokio::select! {
        biased;
        () = cancelled.cancelled() => false,
        reached = states.wait_for(|state| state.is_terminal()) => reached.is_ok(),
    };
    if terminal {
        tracing::debug!("session reached a terminal state, stopping presence polling");
        poller.stop();
    }
}
