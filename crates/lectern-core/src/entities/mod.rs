//! Entity structs for Lectern domain objects.
//!
//! Backend-owned records (`Session`, `User`, `TrainingAssignment`) serialize
//! with `camelCase` field names to match the REST payloads. Meeting-scoped
//! types (`AttendeeSnapshot`, `ChatMessage`) are never persisted.

mod attendee;
mod chat;
mod session;
mod training;
mod user;

pub use attendee::{AttendeeObservation, AttendeeSnapshot, MediaState};
pub use chat::ChatMessage;
pub use session::{Session, SessionPatch};
pub use training::TrainingAssignment;
pub use user::{Profile, User};
