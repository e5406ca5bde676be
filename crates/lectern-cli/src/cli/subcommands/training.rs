use clap::Subcommand;

/// Training assignment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TrainingCommands {
    /// Assign a training module to a user.
    Assign {
        #[arg(long)]
        user: String,
        #[arg(long)]
        title: String,
        /// RFC 3339 due date
        #[arg(long)]
        due: String,
    },
    /// List training assignments.
    List {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
}
