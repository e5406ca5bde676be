use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A message posted to a session's chat. Session-scoped and append-only.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Monotonically increasing sequence number within the session.
    pub id: u64,
    pub sender_name: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}
