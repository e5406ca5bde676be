//! # lectern-api
//!
//! REST collaborator for the Lectern backend.
//!
//! [`EntityService`] is the abstract contract the rest of the workspace
//! consumes: create/update/list/delete over an [`EntityKind`], plus a binary
//! upload for lecture recordings. Records cross the seam as JSON values;
//! [`decode`] and [`decode_list`] turn them into typed entities.
//!
//! [`HttpEntityService`] is the reqwest implementation. It attaches the
//! bearer token from a shared [`lectern_auth::CredentialStore`] to every call.

mod client;
mod error;
mod http;

pub use client::HttpEntityService;
pub use error::ServiceError;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ── Types ──────────────────────────────────────────────────────────

/// Backend resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Users,
    Lectures,
    Schedules,
    Training,
}

impl EntityKind {
    /// URL path segment for the collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Lectures => "lectures",
            Self::Schedules => "schedules",
            Self::Training => "training",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query-string filter for [`EntityService::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    params: Vec<(String, String)>,
}

impl ListFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// A file to upload, e.g. a lecture recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedBinary {
    pub url: String,
}

// ── Contract ───────────────────────────────────────────────────────

/// Request/response mapper over the backend's REST collections.
///
/// Implementations must not retry and must not substitute fabricated data
/// on failure; every error reaches the caller as a [`ServiceError`].
#[async_trait]
pub trait EntityService: Send + Sync {
    /// Create a record and return it as stored by the backend.
    async fn create(&self, kind: EntityKind, payload: Value) -> Result<Value, ServiceError>;

    /// Apply a partial update and return the updated record.
    async fn update(&self, kind: EntityKind, id: &str, patch: Value)
    -> Result<Value, ServiceError>;

    /// List records, optionally filtered.
    async fn list(
        &self,
        kind: EntityKind,
        filter: Option<&ListFilter>,
    ) -> Result<Vec<Value>, ServiceError>;

    /// Delete a record.
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), ServiceError>;

    /// Upload a binary attached to a session, as one atomic call.
    async fn upload_binary(
        &self,
        session_id: &str,
        file: BinaryPayload,
    ) -> Result<UploadedBinary, ServiceError>;
}

/// Decode one JSON record into a typed entity.
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] if the record does not match `T`.
pub fn decode<T: DeserializeOwned>(record: Value) -> Result<T, ServiceError> {
    serde_json::from_value(record).map_err(|e| ServiceError::Decode(e.to_string()))
}

/// Decode a list of JSON records into typed entities.
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] on the first record that does not match `T`.
pub fn decode_list<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>, ServiceError> {
    records.into_iter().map(decode).collect()
}

/// Serialize a typed payload into the JSON body for `create`/`update`.
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] if `payload` cannot be represented as JSON.
pub fn encode<T: Serialize>(payload: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(payload).map_err(|e| ServiceError::Decode(e.to_string()))
}
