use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

/// Role-specific profile data. Each variant carries only the fields that
/// apply to that role.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Profile {
    #[serde(rename_all = "camelCase")]
    Student {
        batch_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        enrollment_number: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Educator {
        subject: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        qualification: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Admin {
        #[serde(default)]
        permissions: Vec<String>,
    },
}

impl Profile {
    #[must_use]
    pub const fn role(&self) -> UserRole {
        match self {
            Self::Student { .. } => UserRole::Student,
            Self::Educator { .. } => UserRole::Educator,
            Self::Admin { .. } => UserRole::Admin,
        }
    }
}

/// A platform account.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile: Profile,
}

impl User {
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.profile.role()
    }
}
