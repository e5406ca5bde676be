use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(&action, ctx, flags),
        Commands::Session { action } => commands::session::handle(&action, ctx, flags).await,
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Training { action } => commands::training::handle(&action, ctx, flags).await,
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
