use clap::{Args, Subcommand};

/// User account commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// List users.
    List {
        /// student, educator or admin
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Create a user.
    Create(UserCreateArgs),
    /// Delete a user by ID.
    Delete { id: String },
}

#[derive(Clone, Debug, Args)]
pub struct UserCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// student, educator or admin
    #[arg(long)]
    pub role: String,
    /// Batch (students)
    #[arg(long)]
    pub batch: Option<String>,
    /// Enrollment number (students)
    #[arg(long)]
    pub enrollment: Option<String>,
    /// Subject taught (educators)
    #[arg(long)]
    pub subject: Option<String>,
    /// Qualification (educators)
    #[arg(long)]
    pub qualification: Option<String>,
    /// Granted permission, repeatable (admins)
    #[arg(long)]
    pub permission: Vec<String>,
}
