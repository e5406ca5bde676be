//! Form payloads submitted to the backend, with client-side validation.
//!
//! Each request type serializes to the JSON body the backend expects and
//! exposes `validate()`, which must pass before the payload is sent.
//! Validation failures are [`CoreError::Validation`] with a message naming
//! the offending field.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Profile;
use crate::enums::SessionMode;
use crate::errors::CoreError;

fn require_non_blank(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field} is required")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// NewUser
// ---------------------------------------------------------------------------

/// Payload for creating (or fully replacing) a user account.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub profile: Profile,
}

impl NewUser {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a blank name, an email without
    /// `@`, or a profile missing its role-specific required field.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_blank(&self.name, "name")?;
        require_non_blank(&self.email, "email")?;
        if !self.email.contains('@') {
            return Err(CoreError::validation(format!(
                "email '{}' is not a valid address",
                self.email
            )));
        }
        match &self.profile {
            Profile::Student { batch_id, .. } => require_non_blank(batch_id, "batchId"),
            Profile::Educator { subject, .. } => require_non_blank(subject, "subject"),
            Profile::Admin { .. } => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// ScheduleRequest
// ---------------------------------------------------------------------------

/// Payload for scheduling a new lecture.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub batch_id: String,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub mode: SessionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_reference: Option<String>,
    #[serde(default)]
    pub is_recording_enabled: bool,
}

impl ScheduleRequest {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the title or batch is blank,
    /// the end does not come after the start, or a live session has no
    /// meeting link.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_blank(&self.title, "title")?;
        require_non_blank(&self.batch_id, "batchId")?;
        if self.scheduled_end <= self.scheduled_start {
            return Err(CoreError::validation(
                "scheduledEnd must be after scheduledStart",
            ));
        }
        let has_link = self
            .meeting_reference
            .as_deref()
            .is_some_and(|link| !link.trim().is_empty());
        if self.mode.requires_meeting_reference() && !has_link {
            return Err(CoreError::validation(
                "meetingReference is required for live sessions",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TrainingAssignmentRequest
// ---------------------------------------------------------------------------

/// Payload for assigning a training module to a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingAssignmentRequest {
    pub user_id: String,
    pub title: String,
    pub due_at: DateTime<Utc>,
}

impl TrainingAssignmentRequest {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the user or title is blank or
    /// the due date is not after `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), CoreError> {
        require_non_blank(&self.user_id, "userId")?;
        require_non_blank(&self.title, "title")?;
        if self.due_at <= now {
            return Err(CoreError::validation("dueAt must be in the future"));
        }
        Ok(())
    }
}
