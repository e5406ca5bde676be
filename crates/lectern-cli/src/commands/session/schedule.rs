use lectern_api::{EntityKind, EntityService};
use lectern_core::entities::Session;
use lectern_core::enums::SessionMode;
use lectern_core::forms::ScheduleRequest;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ScheduleArgs;
use crate::commands::shared::parse::{parse_enum, parse_timestamp};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &ScheduleArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = build_request(args)?;
    request.validate()?;

    let created = ctx
        .service()?
        .create(EntityKind::Lectures, lectern_api::encode(&request)?)
        .await?;
    let session: Session = lectern_api::decode(created)?;
    tracing::info!(session = %session.id, start = %session.scheduled_start, "lecture scheduled");
    output(&session, flags.format)
}

fn build_request(args: &ScheduleArgs) -> anyhow::Result<ScheduleRequest> {
    let mode: SessionMode = parse_enum(&args.mode, "mode")?;
    Ok(ScheduleRequest {
        title: args.title.clone(),
        description: args.description.clone().unwrap_or_default(),
        subject: args.subject.clone(),
        batch_id: args.batch.clone(),
        scheduled_start: parse_timestamp(&args.start, "start")?,
        scheduled_end: parse_timestamp(&args.end, "end")?,
        mode,
        meeting_reference: args.meeting_link.clone(),
        is_recording_enabled: args.record,
    })
}
