mod list;
mod schedule;
mod transition;
mod watch;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::context::AppContext;

/// Handle `lct session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::List {
            bucket,
            search,
            limit,
        } => list::run(bucket, search.as_deref(), *limit, ctx, flags).await,
        SessionCommands::Schedule(args) => schedule::run(args, ctx, flags).await,
        SessionCommands::Start { id } => transition::start(id, ctx, flags).await,
        SessionCommands::End { id, yes, recording } => {
            transition::end(id, *yes, recording.as_deref(), ctx, flags).await
        }
        SessionCommands::Cancel { id, reason } => transition::cancel(id, reason, ctx, flags).await,
        SessionCommands::Watch {
            id,
            interval_ms,
            cycles,
        } => watch::run(id, *interval_ms, *cycles, ctx, flags).await,
    }
}
