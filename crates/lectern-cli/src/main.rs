#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]

use clap::Parser;
use lectern_api::ServiceError;
use lectern_session::SessionError;

mod cli;
mod commands;
mod context;
mod output;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("lct error: {error:#}");
        if let Some(hint) = hint_for(&error) {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
}

/// Next step for failures the user can fix from the terminal.
fn hint_for(error: &anyhow::Error) -> Option<&'static str> {
    let service = error.chain().find_map(|cause| {
        cause.downcast_ref::<ServiceError>().or_else(|| {
            match cause.downcast_ref::<SessionError>() {
                Some(SessionError::Service(inner)) => Some(inner),
                _ => None,
            }
        })
    })?;
    if service.is_auth() {
        Some("run `lct auth login --token <token>` or set LECTERN_AUTH__TOKEN")
    } else if service.is_network() {
        Some("check api.base_url and that the backend is reachable")
    } else {
        None
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let config = lectern_config::LecternConfig::load_with_dotenv()?;
    let ctx = context::AppContext::init(config)?;
    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LECTERN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
