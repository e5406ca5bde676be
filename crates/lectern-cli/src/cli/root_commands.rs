use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, SessionCommands, TrainingCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Bearer token management.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Lectures: listing, scheduling and live control.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// User accounts.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Training assignments.
    Training {
        #[command(subcommand)]
        action: TrainingCommands,
    },
    /// Print the JSON schema of an entity type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity type, e.g. session, attendee, user, schedule-request.
    pub type_name: String,
}
