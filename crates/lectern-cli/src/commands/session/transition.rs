use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use lectern_api::{BinaryPayload, EntityService};
use lectern_session::{EndConfirmation, RecordingStatus, SessionLifecycleController};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn start(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let controller = open(id, ctx).await?;
    controller.start().await?;
    output(&controller.snapshot(), flags.format)
}

pub async fn end(
    id: &str,
    yes: bool,
    recording: Option<&Path>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let controller = open(id, ctx).await?;
    if let Some(path) = recording {
        controller.stage_recording(read_recording(path).await?)?;
    }
    controller
        .end(EndConfirmation::from(yes))
        .await
        .map_err(|error| {
            let error = anyhow::Error::from(error);
            if yes {
                error
            } else {
                error.context("pass --yes to confirm ending the lecture")
            }
        })?;

    let mut status = controller.subscribe_recording();
    if let Err(error) = status.wait_for(RecordingStatus::is_settled).await {
        tracing::warn!(%error, "recording status channel closed before upload settled");
    }
    if let RecordingStatus::Failed(reason) = controller.recording_status() {
        tracing::warn!(session = id, %reason, "lecture ended but the recording was not attached");
    }
    output(&controller.snapshot(), flags.format)
}

pub async fn cancel(
    id: &str,
    reason: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let controller = open(id, ctx).await?;
    controller.cancel(reason).await?;
    output(&controller.snapshot(), flags.format)
}

async fn open(id: &str, ctx: &AppContext) -> anyhow::Result<SessionLifecycleController> {
    let service: Arc<dyn EntityService> = Arc::new(ctx.service()?.clone());
    let session = lectern_session::fetch_session(service.as_ref(), id).await?;
    Ok(SessionLifecycleController::new(
        session,
        service,
        ctx.config.general.display_name.clone(),
    ))
}

async fn read_recording(path: &Path) -> anyhow::Result<BinaryPayload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read recording {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("recording path has no file name: {}", path.display()))?
        .to_string();
    Ok(BinaryPayload {
        content_type: content_type(path).to_string(),
        file_name,
        bytes,
    })
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mov") => "video/quicktime",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}
