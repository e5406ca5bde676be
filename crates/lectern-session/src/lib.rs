//! # lectern-session
//!
//! Client-side coordination for an open teaching session:
//!
//! - [`SessionLifecycleController`]: lifecycle state machine, elapsed clock,
//!   recording flag, media toggles and chat for one session
//! - [`PresencePoller`]: interval-driven attendee roster
//! - [`LiveSessionView`]: a controller composed with the poller for its
//!   session, which stops polling once the session ends
//! - [`catalog`]: pure bucketing and search over session lists
//!
//! Controllers and pollers are explicit per-session instances; timers they
//! start are torn down when they are closed, stopped or dropped.

pub mod catalog;
mod chat;
mod clock;
mod error;
mod lifecycle;
pub mod presence;
mod view;

pub use chat::ChatLog;
pub use clock::ElapsedClock;
pub use error::{Command, ErrorKind, SessionError};
pub use lifecycle::{EndConfirmation, RecordingStatus, SessionLifecycleController};
pub use presence::{DemoRosterSource, PresencePoller, RosterSource, RosterView};
pub use view::LiveSessionView;

use lectern_api::{EntityKind, EntityService, ListFilter, ServiceError};
use lectern_core::entities::Session;

/// Fetch all lecture records and decode them.
///
/// Records whose `scheduled_end` does not come after `scheduled_start` are
/// skipped with a warning.
///
/// # Errors
///
/// Returns the backend's [`ServiceError`], or `Decode` for a malformed record.
pub async fn list_sessions(
    service: &dyn EntityService,
    filter: Option<&ListFilter>,
) -> Result<Vec<Session>, ServiceError> {
    let records = service.list(EntityKind::Lectures, filter).await?;
    let mut sessions: Vec<Session> = lectern_api::decode_list(records)?;
    sessions.retain(|session| {
        let valid = session.has_valid_window();
        if !valid {
            tracing::warn!(session = %session.id, "skipping lecture that ends before it starts");
        }
        valid
    });
    Ok(sessions)
}

/// Load one lecture by id.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] when no record carries `session_id`.
pub async fn fetch_session(
    service: &dyn EntityService,
    session_id: &str,
) -> Result<Session, ServiceError> {
    let filter = ListFilter::new().with("id", session_id);
    list_sessions(service, Some(&filter))
        .await?
        .into_iter()
        .find(|s| s.id == session_id)
        .ok_or_else(|| ServiceError::NotFound(format!("lecture {session_id}")))
}
