//! Lifecycle controller for one open session.
//!
//! The controller owns the local copy of a [`Session`] while it is open and
//! advances `lifecycle_state` only after the backend acknowledges a
//! transition. Transition commands are serialized: a second command issued
//! while one is pending fails with [`SessionError::OperationInFlight`].
//!
//! ```text
//! scheduled ──start──▶ in_progress ──end──▶ completed
//!     │                    │
//!     └──────cancel────────┴──cancel──▶ cancelled
//! ```
//!
//! Recording, media and chat are local layers on top of the state machine.

use std::sync::Arc;

use chrono::Utc;
use lectern_api::{BinaryPayload, EntityKind, EntityService, ServiceError};
use lectern_core::entities::{ChatMessage, MediaState, Session, SessionPatch};
use lectern_core::enums::LifecycleState;
use lectern_core::responses::SessionCommandResponse;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::chat::ChatLog;
use crate::clock::ElapsedClock;
use crate::error::{Command, SessionError};

/// Explicit confirmation required by [`SessionLifecycleController::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndConfirmation {
    Confirmed,
    Unconfirmed,
}

impl From<bool> for EndConfirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed { Self::Confirmed } else { Self::Unconfirmed }
    }
}

/// Progress of the recording attached after `end()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecordingStatus {
    #[default]
    Idle,
    Pending,
    Attached(String),
    Failed(String),
}

impl RecordingStatus {
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

struct ControllerState {
    session: Session,
    in_flight: bool,
    closed: bool,
    is_recording: bool,
    media: MediaState,
    chat: ChatLog,
    staged_recording: Option<BinaryPayload>,
}

struct Inner {
    service: Arc<dyn EntityService>,
    display_name: String,
    state: Mutex<ControllerState>,
    clock: ElapsedClock,
    recording: watch::Sender<RecordingStatus>,
    lifecycle: watch::Sender<LifecycleState>,
}

/// Clears the in-flight flag however the transition future finishes,
/// including being dropped mid-await.
struct InFlight<'a>(&'a Inner);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.state.lock().in_flight = false;
    }
}

/// State machine and live-view state for a single session.
pub struct SessionLifecycleController {
    inner: Arc<Inner>,
}

impl SessionLifecycleController {
    /// Open a controller over `session`. `display_name` is used as the chat
    /// sender for messages posted from this view.
    #[must_use]
    pub fn new(
        session: Session,
        service: Arc<dyn EntityService>,
        display_name: impl Into<String>,
    ) -> Self {
        let (recording, _) = watch::channel(RecordingStatus::Idle);
        let (lifecycle, _) = watch::channel(session.lifecycle_state);
        Self {
            inner: Arc::new(Inner {
                service,
                display_name: display_name.into(),
                state: Mutex::new(ControllerState {
                    session,
                    in_flight: false,
                    closed: false,
                    is_recording: false,
                    media: MediaState {
                        has_video: true,
                        has_audio: true,
                        is_presenting: false,
                    },
                    chat: ChatLog::new(),
                    staged_recording: None,
                }),
                clock: ElapsedClock::new(),
                recording,
                lifecycle,
            }),
        }
    }

    // -- transitions --------------------------------------------------------

    /// Move a scheduled session to in-progress and start the elapsed clock.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidTransition`] from a terminal state,
    /// [`SessionError::OperationInFlight`] while another command is pending,
    /// or the backend's [`SessionError::Service`] failure.
    pub async fn start(&self) -> Result<LifecycleState, SessionError> {
        self.transition(
            Command::Start,
            SessionPatch::transition(LifecycleState::InProgress),
        )
        .await
    }

    /// Complete an in-progress session. Requires explicit confirmation.
    ///
    /// When recording is enabled and a recording was staged, it is uploaded
    /// in the background; watch [`Self::subscribe_recording`] for the result.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] without confirmation, otherwise as
    /// [`Self::start`].
    pub async fn end(&self, confirmation: EndConfirmation) -> Result<LifecycleState, SessionError> {
        self.ensure_open()?;
        if confirmation != EndConfirmation::Confirmed {
            return Err(SessionError::validation(
                "ending a session must be confirmed",
            ));
        }
        self.transition(
            Command::End,
            SessionPatch::transition(LifecycleState::Completed),
        )
        .await
    }

    /// Cancel a scheduled or in-progress session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] for a blank reason, otherwise as
    /// [`Self::start`].
    pub async fn cancel(&self, reason: &str) -> Result<LifecycleState, SessionError> {
        self.ensure_open()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(SessionError::validation("a cancellation reason is required"));
        }
        self.transition(Command::Cancel, SessionPatch::cancellation(reason))
            .await
    }

    async fn transition(
        &self,
        command: Command,
        patch: SessionPatch,
    ) -> Result<LifecycleState, SessionError> {
        let target = command.target();
        let (session_id, _in_flight) = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(SessionError::Closed);
            }
            if state.in_flight {
                return Err(SessionError::OperationInFlight);
            }
            let current = state.session.lifecycle_state;
            if current.is_terminal() {
                return Err(SessionError::InvalidTransition {
                    from: current,
                    command,
                });
            }
            if current == target {
                tracing::debug!(session = %state.session.id, %command, "already {current}, nothing to do");
                return Ok(current);
            }
            if !current.can_transition_to(target) {
                return Err(SessionError::InvalidTransition {
                    from: current,
                    command,
                });
            }
            state.in_flight = true;
            (state.session.id.clone(), InFlight(&self.inner))
        };

        tracing::debug!(session = %session_id, %command, "requesting transition to {target}");
        let body = lectern_api::encode(&patch)?;
        let record = self
            .inner
            .service
            .update(EntityKind::Lectures, &session_id, body)
            .await?;
        let acknowledged: Session = lectern_api::decode(record)?;

        let mut state = self.inner.state.lock();
        if state.closed {
            tracing::debug!(session = %session_id, %command, "view closed, discarding acknowledgment");
            return Err(SessionError::Closed);
        }
        state.session = acknowledged;
        state.session.lifecycle_state = target;
        self.inner.lifecycle.send_replace(target);

        match command {
            Command::Start => self.inner.clock.start(),
            Command::End => {
                self.inner.clock.freeze();
                state.is_recording = false;
                let staged = state.staged_recording.take();
                if state.session.is_recording_enabled
                    && let Some(file) = staged
                {
                    spawn_recording_upload(Arc::clone(&self.inner), session_id.clone(), file);
                }
            }
            Command::Cancel => {
                self.inner.clock.freeze();
                state.is_recording = false;
                state.staged_recording = None;
            }
        }
        tracing::info!(session = %session_id, "session is now {target}");
        Ok(target)
    }

    // -- recording ------------------------------------------------------------

    /// Turn the recording flag on. Repeated calls are no-ops.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidOperation`] unless the session is in progress.
    pub fn start_recording(&self) -> Result<bool, SessionError> {
        self.set_recording(true, "start recording")
    }

    /// Turn the recording flag off. Repeated calls are no-ops.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidOperation`] unless the session is in progress.
    pub fn stop_recording(&self) -> Result<bool, SessionError> {
        self.set_recording(false, "stop recording")
    }

    fn set_recording(&self, on: bool, operation: &'static str) -> Result<bool, SessionError> {
        let mut state = self.inner.state.lock();
        if state.closed {
            return Err(SessionError::Closed);
        }
        let current = state.session.lifecycle_state;
        if current != LifecycleState::InProgress {
            return Err(SessionError::InvalidOperation {
                operation,
                state: current,
            });
        }
        state.is_recording = on;
        Ok(on)
    }

    /// Stage the file to attach as the recording when the session ends.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidOperation`] when recording is disabled for the
    /// session or the session already reached a terminal state.
    pub fn stage_recording(&self, file: BinaryPayload) -> Result<(), SessionError> {
        let mut state = self.inner.state.lock();
        if state.closed {
            return Err(SessionError::Closed);
        }
        let current = state.session.lifecycle_state;
        if !state.session.is_recording_enabled || current.is_terminal() {
            return Err(SessionError::InvalidOperation {
                operation: "attach a recording",
                state: current,
            });
        }
        state.staged_recording = Some(file);
        Ok(())
    }

    // -- media ------------------------------------------------------------------

    /// Flip the microphone. Returns the new media state.
    pub fn toggle_mute(&self) -> MediaState {
        self.update_media(|media| media.has_audio = !media.has_audio)
    }

    /// Flip the camera. Returns the new media state.
    pub fn toggle_video(&self) -> MediaState {
        self.update_media(|media| media.has_video = !media.has_video)
    }

    /// Flip screen sharing. Returns the new media state.
    pub fn toggle_screen_share(&self) -> MediaState {
        self.update_media(|media| media.is_presenting = !media.is_presenting)
    }

    fn update_media(&self, flip: impl FnOnce(&mut MediaState)) -> MediaState {
        let mut state = self.inner.state.lock();
        flip(&mut state.media);
        state.media
    }

    // -- chat -----------------------------------------------------------------

    /// Append a chat message from this view's display name.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] for a blank body, [`SessionError::Closed`]
    /// after [`Self::close`].
    pub fn post_message(&self, body: &str) -> Result<ChatMessage, SessionError> {
        let mut state = self.inner.state.lock();
        if state.closed {
            return Err(SessionError::Closed);
        }
        state.chat.post(&self.inner.display_name, body, Utc::now())
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.state.lock().chat.messages().to_vec()
    }

    // -- teardown ---------------------------------------------------------------

    /// Tear down the view: stop the clock and discard any result that
    /// arrives afterwards. Idempotent.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        state.staged_recording = None;
        self.inner.clock.freeze();
        tracing::debug!(session = %state.session.id, "session view closed");
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.inner.state.lock().closed {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    // -- queries ----------------------------------------------------------------

    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.state.lock().session.clone()
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.inner.state.lock().session.lifecycle_state
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.inner.clock.elapsed_secs()
    }

    /// Elapsed seconds, republished once per second while in progress.
    #[must_use]
    pub fn subscribe_elapsed(&self) -> watch::Receiver<u64> {
        self.inner.clock.subscribe()
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.inner.state.lock().is_recording
    }

    #[must_use]
    pub fn media(&self) -> MediaState {
        self.inner.state.lock().media
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// Lifecycle state, republished after every acknowledged transition.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.inner.lifecycle.subscribe()
    }

    #[must_use]
    pub fn recording_status(&self) -> RecordingStatus {
        self.inner.recording.borrow().clone()
    }

    #[must_use]
    pub fn subscribe_recording(&self) -> watch::Receiver<RecordingStatus> {
        self.inner.recording.subscribe()
    }

    /// Current view as returned by the CLI session commands.
    #[must_use]
    pub fn snapshot(&self) -> SessionCommandResponse {
        let (session, is_recording) = {
            let state = self.inner.state.lock();
            (state.session.clone(), state.is_recording)
        };
        SessionCommandResponse {
            session,
            elapsed_secs: self.elapsed_secs(),
            is_recording,
            recording_pending: self.recording_status() == RecordingStatus::Pending,
        }
    }
}

impl Drop for SessionLifecycleController {
    fn drop(&mut self) {
        self.close();
    }
}

fn spawn_recording_upload(inner: Arc<Inner>, session_id: String, file: BinaryPayload) {
    inner.recording.send_replace(RecordingStatus::Pending);
    tokio::spawn(async move {
        let outcome = upload_recording(inner.service.as_ref(), &session_id, file).await;
        let mut state = inner.state.lock();
        if state.closed {
            tracing::debug!(session = %session_id, "view closed, discarding recording result");
            return;
        }
        match outcome {
            Ok(url) => {
                tracing::info!(session = %session_id, %url, "recording attached");
                state.session.recording_reference = Some(url.clone());
                inner.recording.send_replace(RecordingStatus::Attached(url));
            }
            Err(e) => {
                tracing::warn!(session = %session_id, "recording upload failed: {e}");
                inner.recording.send_replace(RecordingStatus::Failed(e.to_string()));
            }
        }
    });
}

async fn upload_recording(
    service: &dyn EntityService,
    session_id: &str,
    file: BinaryPayload,
) -> Result<String, ServiceError> {
    let uploaded = service.upload_binary(session_id, file).await?;
    let patch = lectern_api::encode(&SessionPatch::recording(&uploaded.url))?;
    service
        .update(EntityKind::Lectures, session_id, patch)
        .await?;
    Ok(uploaded.url)
}
