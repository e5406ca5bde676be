use chrono::{DateTime, Local, TimeZone};
use lectern_core::entities::Session;
use lectern_core::responses::ScheduleListResponse;
use lectern_session::catalog::{self, Bucket};

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    bucket: &str,
    query: Option<&str>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let bucket: Bucket = bucket.parse().map_err(anyhow::Error::msg)?;
    let sessions = lectern_session::list_sessions(ctx.service()?, None).await?;
    tracing::debug!(count = sessions.len(), %bucket, "session list: fetched lectures");

    let mut response = select(&sessions, bucket, query, &Local::now());
    response
        .sessions
        .truncate(effective_limit(limit, flags.limit, ctx.config.general.default_limit));
    output(&response, flags.format)
}

/// Search first, then bucket the matches. `total` counts matches before any
/// limit is applied.
fn select<Tz: TimeZone>(
    sessions: &[Session],
    bucket: Bucket,
    query: Option<&str>,
    now: &DateTime<Tz>,
) -> ScheduleListResponse {
    let matched: Vec<Session> = catalog::search(sessions, query.unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();
    let selected: Vec<Session> = catalog::bucket(&matched, now)
        .get(bucket)
        .iter()
        .map(|session| (*session).clone())
        .collect();
    ScheduleListResponse {
        bucket: bucket.to_string(),
        query: query.map(str::to_string),
        total: selected.len(),
        sessions: selected,
    }
}
