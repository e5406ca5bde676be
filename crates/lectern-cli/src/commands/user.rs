use lectern_api::{EntityKind, EntityService, ListFilter};
use lectern_core::entities::{Profile, User};
use lectern_core::enums::UserRole;
use lectern_core::forms::NewUser;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{UserCommands, UserCreateArgs};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserListResponse {
    role: Option<UserRole>,
    users: Vec<User>,
    total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDeleteResponse {
    id: String,
    deleted: bool,
}

/// Handle `lct user`.
pub async fn handle(action: &UserCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = ctx.service()?;
    match action {
        UserCommands::List { role, limit } => {
            let role = role
                .as_deref()
                .map(|raw| parse_enum::<UserRole>(raw, "role"))
                .transpose()?;
            let filter = role.map(|role| ListFilter::new().with("role", role.as_str()));
            let records = service.list(EntityKind::Users, filter.as_ref()).await?;
            let mut users: Vec<User> = lectern_api::decode_list(records)?;
            if let Some(role) = role {
                users.retain(|user| user.role() == role);
            }
            let total = users.len();
            users.truncate(effective_limit(*limit, flags.limit, ctx.config.general.default_limit));
            output(&UserListResponse { role, users, total }, flags.format)
        }
        UserCommands::Create(args) => {
            let payload = new_user(args)?;
            payload.validate()?;
            let created = service
                .create(EntityKind::Users, lectern_api::encode(&payload)?)
                .await?;
            let user: User = lectern_api::decode(created)?;
            tracing::info!(user = %user.id, role = %user.role(), "user created");
            output(&user, flags.format)
        }
        UserCommands::Delete { id } => {
            service.delete(EntityKind::Users, id).await?;
            output(
                &UserDeleteResponse {
                    id: id.clone(),
                    deleted: true,
                },
                flags.format,
            )
        }
    }
}

/// Build the role-specific profile from the create flags.
fn new_user(args: &UserCreateArgs) -> anyhow::Result<NewUser> {
    let role: UserRole = parse_enum(&args.role, "role")?;
    let profile = match role {
        UserRole::Student => Profile::Student {
            batch_id: args.batch.clone().unwrap_or_default(),
            enrollment_number: args.enrollment.clone(),
        },
        UserRole::Educator => Profile::Educator {
            subject: args.subject.clone().unwrap_or_default(),
            qualification: args.qualification.clone(),
        },
        UserRole::Admin => Profile::Admin {
            permissions: args.permission.clone(),
        },
    };
    Ok(NewUser {
        name: args.name.clone(),
        email: args.email.clone(),
        profile,
    })
}

#[cfg(test)]
mod tests {
    use lectern_core::entities::Profile;
    use pretty_assertions::assert_eq;

    use super::new_user;
    use crate::cli::subcommands::UserCreateArgs;

    fn args(role: &str) -> UserCreateArgs {
        UserCreateArgs {
            name: "Ravi".into(),
            email: "ravi@example.edu".into(),
            role: role.into(),
            batch: Some("b-2".into()),
            enrollment: None,
            subject: Some("Physics".into()),
            qualification: None,
            permission: vec!["users:write".into()],
        }
    }

    #[test]
    fn profile_follows_role() {
        assert_eq!(
            new_user(&args("educator")).unwrap().profile,
            Profile::Educator {
                subject: "Physics".into(),
                qualification: None,
            }
        );
        assert_eq!(
            new_user(&args("admin")).unwrap().profile,
            Profile::Admin {
                permissions: vec!["users:write".into()],
            }
        );
    }

    #[test]
    fn student_without_batch_fails_validation() {
        let mut args = args("student");
        args.batch = None;
        let user = new_user(&args).unwrap();
        assert!(user.validate().is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(new_user(&args("principal")).is_err());
    }
}
