use lectern_core::responses::AuthStatusResponse;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lct auth <subcommand>`.
pub fn handle(action: &AuthCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => {
            ctx.credentials.login(&args.token)?;
            tracing::info!("auth login: token stored");
        }
        AuthCommands::Logout => {
            ctx.credentials.logout()?;
            tracing::info!("auth logout: credentials cleared");
        }
        AuthCommands::Status => {}
    }
    output(&status(ctx), flags.format)
}

fn status(ctx: &AppContext) -> AuthStatusResponse {
    AuthStatusResponse {
        authenticated: ctx.credentials.is_authenticated(),
        source: ctx.credentials.source().map(|source| source.as_str().to_string()),
    }
}
