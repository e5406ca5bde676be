use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{LifecycleState, SessionMode};

/// A schedulable teaching event (lecture). Owned by the backend; the client
/// holds a local copy while the session is open.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educator_name: Option<String>,
    pub batch_id: String,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub mode: SessionMode,
    #[serde(default)]
    pub lifecycle_state: LifecycleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_reference: Option<String>,
    #[serde(default)]
    pub is_recording_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl Session {
    /// Whether the record satisfies `scheduled_end > scheduled_start`.
    #[must_use]
    pub fn has_valid_window(&self) -> bool {
        self.scheduled_end > self.scheduled_start
    }
}

/// Partial update sent to the backend for lifecycle changes.
///
/// Only set fields are serialized, so the backend sees a minimal patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<LifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl SessionPatch {
    #[must_use]
    pub fn transition(state: LifecycleState) -> Self {
        Self {
            lifecycle_state: Some(state),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cancellation(reason: &str) -> Self {
        Self {
            lifecycle_state: Some(LifecycleState::Cancelled),
            cancel_reason: Some(reason.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn recording(url: &str) -> Self {
        Self {
            recording_reference: Some(url.to_string()),
            ..Self::default()
        }
    }
}
