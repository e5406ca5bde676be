use chrono::Utc;
use lectern_api::{EntityKind, EntityService, ListFilter};
use lectern_core::entities::TrainingAssignment;
use lectern_core::forms::TrainingAssignmentRequest;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TrainingCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_timestamp;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrainingListResponse {
    user_id: Option<String>,
    assignments: Vec<TrainingAssignment>,
    total: usize,
}

/// Handle `lct training`.
pub async fn handle(
    action: &TrainingCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = ctx.service()?;
    match action {
        TrainingCommands::Assign { user, title, due } => {
            let request = TrainingAssignmentRequest {
                user_id: user.clone(),
                title: title.clone(),
                due_at: parse_timestamp(due, "due")?,
            };
            request.validate(Utc::now())?;
            let created = service
                .create(EntityKind::Training, lectern_api::encode(&request)?)
                .await?;
            let assignment: TrainingAssignment = lectern_api::decode(created)?;
            tracing::info!(
                assignment = %assignment.id,
                user = %assignment.user_id,
                "training assigned"
            );
            output(&assignment, flags.format)
        }
        TrainingCommands::List { user, limit } => {
            let filter = user
                .as_deref()
                .map(|user_id| ListFilter::new().with("userId", user_id));
            let records = service.list(EntityKind::Training, filter.as_ref()).await?;
            let mut assignments: Vec<TrainingAssignment> = lectern_api::decode_list(records)?;
            if let Some(user_id) = user {
                assignments.retain(|assignment| &assignment.user_id == user_id);
            }
            assignments.sort_by_key(|assignment| assignment.due_at);
            let total = assignments.len();
            assignments.truncate(effective_limit(
                *limit,
                flags.limit,
                ctx.config.general.default_limit,
            ));
            output(
                &TrainingListResponse {
                    user_id: user.clone(),
                    assignments,
                    total,
                },
                flags.format,
            )
        }
    }
}
