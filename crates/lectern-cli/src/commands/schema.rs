use lectern_core::entities::{
    AttendeeSnapshot, ChatMessage, Session, SessionPatch, TrainingAssignment, User,
};
use lectern_core::forms::{NewUser, ScheduleRequest, TrainingAssignmentRequest};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Names accepted by `lct schema`.
const TYPE_NAMES: &[&str] = &[
    "session",
    "session-patch",
    "attendee",
    "chat-message",
    "user",
    "new-user",
    "training-assignment",
    "training-request",
    "schedule-request",
];

/// Handle `lct schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = resolve(&args.type_name)?;
    output(&schema, flags.format)
}

fn resolve(type_name: &str) -> anyhow::Result<serde_json::Value> {
    let schema = match type_name.replace('_', "-").as_str() {
        "session" | "lecture" => schema_for!(Session),
        "session-patch" => schema_for!(SessionPatch),
        "attendee" => schema_for!(AttendeeSnapshot),
        "chat-message" => schema_for!(ChatMessage),
        "user" => schema_for!(User),
        "new-user" => schema_for!(NewUser),
        "training-assignment" => schema_for!(TrainingAssignment),
        "training-request" => schema_for!(TrainingAssignmentRequest),
        "schedule-request" => schema_for!(ScheduleRequest),
        _ => anyhow::bail!(
            "unknown schema type '{type_name}' (expected one of: {})",
            TYPE_NAMES.join(", ")
        ),
    };
    Ok(serde_json::to_value(schema)?)
}
