//! Lecture listing and lookup over the entity service.

mod common;

use chrono::Duration;
use pretty_assertions::assert_eq;

use common::{FakeEntityService, lecture};
use lectern_api::ServiceError;
use lectern_core::enums::LifecycleState;

#[tokio::test]
async fn lectures_ending_before_they_start_are_skipped() {
    let service = FakeEntityService::with_session(&lecture("lec-1", LifecycleState::Scheduled));
    let mut broken = lecture("lec-2", LifecycleState::Scheduled);
    broken.scheduled_end = broken.scheduled_start - Duration::minutes(5);
    service.insert(&broken);

    let sessions = lectern_session::list_sessions(&service, None).await.unwrap();
    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["lec-1"]);
}

#[tokio::test]
async fn fetch_session_reports_missing_lecture() {
    let service = FakeEntityService::with_session(&lecture("lec-1", LifecycleState::Scheduled));

    let found = lectern_session::fetch_session(&service, "lec-1").await.unwrap();
    assert_eq!(found.id, "lec-1");

    let err = lectern_session::fetch_session(&service, "lec-9").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
