//! Serde roundtrip and JsonSchema validation tests for entity types.

use chrono::{TimeZone, Utc};
use schemars::schema_for;
use lectern_core::entities::*;
use lectern_core::enums::*;
use lectern_core::forms::*;
use lectern_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn lecture() -> Session {
    Session {
        id: "lec-41".into(),
        title: "Thermodynamics".into(),
        description: "Second law".into(),
        subject: Some("Physics".into()),
        educator_name: Some("Dr. Rao".into()),
        batch_id: "b-2026-a".into(),
        scheduled_start: Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        scheduled_end: Utc.with_ymd_and_hms(2026, 3, 2, 11, 30, 0).unwrap(),
        mode: SessionMode::Live,
        lifecycle_state: LifecycleState::InProgress,
        meeting_reference: Some("https://meet.example/thermo".into()),
        recording_reference: None,
        is_recording_enabled: true,
        cancel_reason: None,
    }
}

roundtrip_and_validate!(session_roundtrip, Session, lecture());

roundtrip_and_validate!(
    session_patch_roundtrip,
    SessionPatch,
    SessionPatch::recording("https://cdn.example/rec/lec-41.mp4")
);

roundtrip_and_validate!(
    attendee_snapshot_roundtrip,
    AttendeeSnapshot,
    AttendeeSnapshot {
        id: "u-9".into(),
        display_name: "Meera".into(),
        presence: PresenceState::Busy,
        joined_at: Some(Utc::now()),
        media: MediaState {
            has_video: true,
            has_audio: true,
            is_presenting: false,
        },
        role: AttendeeRole::Presenter,
    }
);

roundtrip_and_validate!(
    chat_message_roundtrip,
    ChatMessage,
    ChatMessage {
        id: 3,
        sender_name: "Host".into(),
        body: "Slides are in the shared drive.".into(),
        sent_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    student_roundtrip,
    User,
    User {
        id: "u-1".into(),
        name: "Kiran".into(),
        email: "kiran@example.edu".into(),
        profile: Profile::Student {
            batch_id: "b-2026-a".into(),
            enrollment_number: Some("EN-1001".into()),
        },
    }
);

roundtrip_and_validate!(
    admin_roundtrip,
    User,
    User {
        id: "u-2".into(),
        name: "Office".into(),
        email: "office@example.edu".into(),
        profile: Profile::Admin {
            permissions: vec!["users:write".into()],
        },
    }
);

roundtrip_and_validate!(
    training_roundtrip,
    TrainingAssignment,
    TrainingAssignment {
        id: "tr-5".into(),
        user_id: "u-2".into(),
        title: "Safeguarding".into(),
        due_at: Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
        completed: false,
    }
);

roundtrip_and_validate!(
    schedule_request_roundtrip,
    ScheduleRequest,
    ScheduleRequest {
        title: "Kinematics".into(),
        description: String::new(),
        subject: None,
        batch_id: "b-2026-a".into(),
        scheduled_start: Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap(),
        scheduled_end: Utc.with_ymd_and_hms(2026, 3, 3, 10, 0, 0).unwrap(),
        mode: SessionMode::Recorded,
        meeting_reference: None,
        is_recording_enabled: false,
    }
);

roundtrip_and_validate!(
    session_command_response_roundtrip,
    SessionCommandResponse,
    SessionCommandResponse {
        session: lecture(),
        elapsed_secs: 42,
        is_recording: true,
        recording_pending: false,
    }
);
