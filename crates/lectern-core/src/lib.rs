//! # lectern-core
//!
//! Core types and error types for Lectern.
//!
//! This crate provides the foundational types shared across all Lectern crates:
//! - Entity structs for backend-owned records (sessions, users, training assignments)
//! - Ephemeral meeting types (attendee snapshots, chat messages)
//! - Status enums with state machine transitions
//! - Form payloads with client-side validation
//! - Cross-cutting error types
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod forms;
pub mod responses;
