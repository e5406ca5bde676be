//! CLI response types returned as JSON by `lct` commands.
//!
//! These structs define the shape of JSON output for commands like
//! `lct session start`, `lct session list`, and `lct session watch`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AttendeeSnapshot, Session};

/// Response from `lct session start|end|cancel`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCommandResponse {
    pub session: Session,
    pub elapsed_secs: u64,
    pub is_recording: bool,
    /// A recording upload was started in the background and its reference
    /// has not been attached yet.
    pub recording_pending: bool,
}

/// Response from `lct session list --bucket <bucket>`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleListResponse {
    pub bucket: String,
    pub query: Option<String>,
    pub sessions: Vec<Session>,
    pub total: usize,
}

/// One roster refresh emitted by `lct session watch`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub session_id: String,
    pub cycle: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub attendees: Vec<AttendeeSnapshot>,
    /// Error from the most recent cycle, if that cycle failed.
    pub error: Option<String>,
}

/// Response from `lct auth status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub source: Option<String>,
}
