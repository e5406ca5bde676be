use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AttendeeRole, PresenceState};

/// Camera/microphone/screen-share flags for one participant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaState {
    #[serde(default)]
    pub has_video: bool,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(default)]
    pub is_presenting: bool,
}

/// One participant as reported by the presence feed in a single poll.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeObservation {
    pub id: String,
    pub display_name: String,
    pub presence: PresenceState,
    #[serde(default)]
    pub media: MediaState,
    #[serde(default)]
    pub role: AttendeeRole,
}

/// Ephemeral roster entry maintained by the presence poller.
///
/// `joined_at` is `None` until the attendee is first observed in a
/// non-offline state, and is carried over between polls for as long as the
/// attendee keeps appearing under the same id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeSnapshot {
    pub id: String,
    pub display_name: String,
    pub presence: PresenceState,
    pub joined_at: Option<DateTime<Utc>>,
    pub media: MediaState,
    pub role: AttendeeRole,
}

impl AttendeeSnapshot {
    /// Build a snapshot from an observation, carrying over the join time seen
    /// in the previous poll (if any).
    #[must_use]
    pub fn from_observation(
        observation: AttendeeObservation,
        previous_joined_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let joined_at = previous_joined_at.or_else(|| observation.presence.is_present().then_some(now));
        Self {
            id: observation.id,
            display_name: observation.display_name,
            presence: observation.presence,
            joined_at,
            media: observation.media,
            role: observation.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn observation(presence: PresenceState) -> AttendeeObservation {
        AttendeeObservation {
            id: "u-1".into(),
            display_name: "Asha".into(),
            presence,
            media: MediaState::default(),
            role: AttendeeRole::Attendee,
        }
    }

    #[test]
    fn first_online_observation_sets_join_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let snapshot = AttendeeSnapshot::from_observation(observation(PresenceState::Online), None, now);
        assert_eq!(snapshot.joined_at, Some(now));
    }

    #[test]
    fn offline_observation_has_no_join_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let snapshot = AttendeeSnapshot::from_observation(observation(PresenceState::Offline), None, now);
        assert_eq!(snapshot.joined_at, None);
    }

    #[test]
    fn previous_join_time_wins() {
        let earlier = Utc.with_ymd_and_hms(2026, 3, 2, 9, 50, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        let snapshot =
            AttendeeSnapshot::from_observation(observation(PresenceState::Away), Some(earlier), now);
        assert_eq!(snapshot.joined_at, Some(earlier));
    }

    #[test]
    fn media_defaults_when_absent() {
        let json = serde_json::json!({
            "id": "u-2",
            "displayName": "Ben",
            "presence": "online",
        });
        let parsed: AttendeeObservation = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.media, MediaState::default());
        assert_eq!(parsed.role, AttendeeRole::Attendee);
    }
}
