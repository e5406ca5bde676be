use std::sync::Arc;
use std::time::Duration;

use lectern_api::EntityService;
use lectern_session::{
    DemoRosterSource, LiveSessionView, RosterSource, SessionLifecycleController,
};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Print one roster per settled cycle until `cycles` is reached or ctrl-c.
///
/// Completed and cancelled lectures are refused before any poll is made.
pub async fn run(
    id: &str,
    interval_ms: Option<u64>,
    cycles: Option<u64>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let interval = interval_ms.map_or_else(|| ctx.config.poll_interval(), Duration::from_millis);
    if interval.is_zero() {
        anyhow::bail!("--interval-ms must be greater than zero");
    }

    let service = ctx.service()?.clone();
    let session = lectern_session::fetch_session(&service, id).await?;
    let source: Arc<dyn RosterSource> = if ctx.config.presence.demo_mode {
        tracing::info!(session = id, "presence demo mode: serving a fabricated roster");
        Arc::new(DemoRosterSource::new())
    } else {
        Arc::new(service.clone())
    };
    let controller = SessionLifecycleController::new(
        session,
        Arc::new(service) as Arc<dyn EntityService>,
        ctx.config.general.display_name.clone(),
    );

    let view = LiveSessionView::new(controller, source).with_interval(interval);
    view.start_presence()?;
    let mut updates = view.subscribe_roster();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let roster = updates.borrow_and_update().clone();
                if let Some(error) = &roster.last_error {
                    tracing::warn!(session = id, cycle = roster.cycle, %error, "roster refresh failed");
                }
                tracing::debug!(
                    session = id,
                    cycle = roster.cycle,
                    online = roster.online_count(),
                    "roster refreshed"
                );
                output(&roster.to_response(id), flags.format)?;
                if cycles.is_some_and(|limit| roster.cycle >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!(session = id, "watch interrupted");
                break;
            }
        }
    }

    view.close();
    Ok(())
}
