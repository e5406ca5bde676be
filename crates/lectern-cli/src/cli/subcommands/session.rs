use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Lecture commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// List lectures, optionally bucketed and searched.
    List {
        /// today, upcoming, completed or all
        #[arg(long, default_value = "all")]
        bucket: String,
        /// Case-insensitive match on title, subject, description, educator
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Schedule a new lecture.
    Schedule(ScheduleArgs),
    /// Start a scheduled lecture.
    Start { id: String },
    /// End a live lecture.
    End {
        id: String,
        /// Confirm ending the lecture.
        #[arg(long)]
        yes: bool,
        /// Recording file to attach once the lecture has ended.
        #[arg(long)]
        recording: Option<PathBuf>,
    },
    /// Cancel a scheduled or live lecture.
    Cancel {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Stream the attendee roster of a lecture.
    Watch {
        id: String,
        /// Refresh interval (defaults to presence.interval_ms)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Stop after this many refreshes
        #[arg(long)]
        cycles: Option<u64>,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ScheduleArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub batch: String,
    /// RFC 3339 start time
    #[arg(long)]
    pub start: String,
    /// RFC 3339 end time
    #[arg(long)]
    pub end: String,
    /// live, recorded or hybrid
    #[arg(long, default_value = "live")]
    pub mode: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    /// Conferencing link (required for live lectures)
    #[arg(long)]
    pub meeting_link: Option<String>,
    /// Enable recording for this lecture
    #[arg(long)]
    pub record: bool,
}
