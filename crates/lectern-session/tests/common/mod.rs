//! In-memory collaborators shared by the session integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::Notify;

use lectern_api::{
    BinaryPayload, EntityKind, EntityService, ListFilter, ServiceError, UploadedBinary,
};
use lectern_core::entities::{AttendeeObservation, MediaState, Session};
use lectern_core::enums::{AttendeeRole, LifecycleState, PresenceState, SessionMode};
use lectern_session::RosterSource;

pub fn lecture(id: &str, state: LifecycleState) -> Session {
    let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
    Session {
        id: id.into(),
        title: "Thermodynamics".into(),
        description: "Second law".into(),
        subject: Some("Physics".into()),
        educator_name: Some("Dr. Sharma".into()),
        batch_id: "b-7".into(),
        scheduled_start: start,
        scheduled_end: start + Duration::hours(1),
        mode: SessionMode::Live,
        lifecycle_state: state,
        meeting_reference: Some("https://meet.example/thermo".into()),
        recording_reference: None,
        is_recording_enabled: true,
        cancel_reason: None,
    }
}

pub async fn wait_until(mut check: impl FnMut() -> bool) {
    while !check() {
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Entity service
// ---------------------------------------------------------------------------

/// Backend double: merges patches into stored records and counts calls.
/// When a gate is set, every `update` waits for one `notify_one` on it.
#[derive(Default)]
pub struct FakeEntityService {
    records: Mutex<HashMap<String, Value>>,
    updates: AtomicUsize,
    uploads: AtomicUsize,
    fail_next_update: Mutex<Option<ServiceError>>,
    gate: Option<Arc<Notify>>,
    upload_gate: Option<Arc<Notify>>,
}

impl FakeEntityService {
    pub fn with_session(session: &Session) -> Self {
        let svc = Self::default();
        svc.records.lock().insert(
            session.id.clone(),
            serde_json::to_value(session).expect("session serializes"),
        );
        svc
    }

    pub fn insert(&self, session: &Session) {
        self.records.lock().insert(
            session.id.clone(),
            serde_json::to_value(session).expect("session serializes"),
        );
    }

    pub fn gated(session: &Session, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::with_session(session)
        }
    }

    /// Every `upload_binary` waits for one `notify_one` on `gate`.
    pub fn with_upload_gate(mut self, gate: Arc<Notify>) -> Self {
        self.upload_gate = Some(gate);
        self
    }

    pub fn fail_next_update(&self, error: ServiceError) {
        *self.fail_next_update.lock() = Some(error);
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn stored(&self, id: &str) -> Option<Value> {
        self.records.lock().get(id).cloned()
    }
}

#[async_trait]
impl EntityService for FakeEntityService {
    async fn create(&self, _kind: EntityKind, payload: Value) -> Result<Value, ServiceError> {
        Ok(payload)
    }

    async fn update(
        &self,
        _kind: EntityKind,
        id: &str,
        patch: Value,
    ) -> Result<Value, ServiceError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(error) = self.fail_next_update.lock().take() {
            return Err(error);
        }
        let mut records = self.records.lock();
        let record = records
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), patch) {
            target.extend(fields);
        }
        Ok(record.clone())
    }

    async fn list(
        &self,
        _kind: EntityKind,
        _filter: Option<&ListFilter>,
    ) -> Result<Vec<Value>, ServiceError> {
        Ok(self.records.lock().values().cloned().collect())
    }

    async fn delete(&self, _kind: EntityKind, id: &str) -> Result<(), ServiceError> {
        self.records
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    async fn upload_binary(
        &self,
        session_id: &str,
        file: BinaryPayload,
    ) -> Result<UploadedBinary, ServiceError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.upload_gate {
            gate.notified().await;
        }
        Ok(UploadedBinary {
            url: format!("https://cdn.example/{session_id}/{}", file.file_name),
        })
    }
}

// ---------------------------------------------------------------------------
// Roster source
// ---------------------------------------------------------------------------

pub fn online(id: &str) -> AttendeeObservation {
    AttendeeObservation {
        id: id.into(),
        display_name: id.to_uppercase(),
        presence: PresenceState::Online,
        media: MediaState::default(),
        role: AttendeeRole::Attendee,
    }
}

/// Replays queued responses in order; empty rosters once exhausted.
/// The first `gated_calls` fetches each wait for one notification on `gate`.
#[derive(Default)]
pub struct ScriptedRoster {
    responses: Mutex<VecDeque<Result<Vec<AttendeeObservation>, ServiceError>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    gate: Arc<Notify>,
    gated_calls: usize,
}

impl ScriptedRoster {
    pub fn new(
        responses: impl IntoIterator<Item = Result<Vec<AttendeeObservation>, ServiceError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn gated(mut self, gated_calls: usize) -> Self {
        self.gated_calls = gated_calls;
        self
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RosterSource for ScriptedRoster {
    async fn fetch_roster(
        &self,
        _session_ref: &str,
    ) -> Result<Vec<AttendeeObservation>, ServiceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        if call < self.gated_calls {
            self.gate.notified().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
