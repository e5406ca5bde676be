//! # lectern-auth
//!
//! Bearer credential handling for Lectern.
//!
//! The backend owns authentication; this crate only keeps the token that
//! every REST call attaches. A [`CredentialStore`] is set at login and
//! cleared at logout, and is shared by all clients in the process.

pub mod error;
pub mod store;
pub mod token_file;

pub use error::AuthError;
pub use store::{CredentialStore, TokenSource};
