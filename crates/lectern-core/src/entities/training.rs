use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A training module assigned to a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingAssignment {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}
