use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lectern_api::ServiceError;
use lectern_core::entities::{AttendeeObservation, MediaState};
use lectern_core::enums::{AttendeeRole, PresenceState};

use super::RosterSource;

const FIXTURE: &[(&str, &str, AttendeeRole)] = &[
    ("demo-host", "Meera Iyer", AttendeeRole::Organizer),
    ("demo-ta", "Arjun Rao", AttendeeRole::Presenter),
    ("demo-s1", "Kavya Nair", AttendeeRole::Attendee),
    ("demo-s2", "Rohan Das", AttendeeRole::Attendee),
    ("demo-s3", "Ishita Sen", AttendeeRole::Attendee),
];

/// Fixture roster used when `presence.demo_mode` is enabled.
///
/// Deterministic: presence rotates with the call count, and the last
/// attendee drops out on every third cycle so departures are visible.
/// Never used as a fallback for a failing backend.
#[derive(Debug, Default)]
pub struct DemoRosterSource {
    calls: AtomicU64,
}

impl DemoRosterSource {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
        }
    }

    fn roster_for(call: u64) -> Vec<AttendeeObservation> {
        FIXTURE
            .iter()
            .enumerate()
            .filter(|(i, _)| !(*i == FIXTURE.len() - 1 && call % 3 == 2))
            .map(|(i, &(id, name, role))| {
                let presence = match (call + i as u64) % 5 {
                    3 => PresenceState::Away,
                    4 if role == AttendeeRole::Attendee => PresenceState::Busy,
                    _ => PresenceState::Online,
                };
                AttendeeObservation {
                    id: id.to_string(),
                    display_name: name.to_string(),
                    presence,
                    media: MediaState {
                        has_video: role != AttendeeRole::Attendee,
                        has_audio: presence == PresenceState::Online,
                        is_presenting: role == AttendeeRole::Presenter,
                    },
                    role,
                }
            })
            .collect()
    }
}

#[async_trait]
impl RosterSource for DemoRosterSource {
    async fn fetch_roster(
        &self,
        _session_ref: &str,
    ) -> Result<Vec<AttendeeObservation>, ServiceError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(Self::roster_for(call))
    }
}
