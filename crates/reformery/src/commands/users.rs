//! User command handlers.

use tabled::Tabled;

use reformery_core::{DashboardController, ResourceData, ResourceName, User, UserFilter, UserForm};

use crate::cli::{GlobalOpts, UserListArgs, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.display_name().to_owned(),
            email: u.email.clone(),
            role: u.role.to_string(),
            active: output::yes_no(u.active),
            phone: output::or_dash(u.phone.as_deref()),
        }
    }
}

impl From<UserListArgs> for UserFilter {
    fn from(args: UserListArgs) -> Self {
        Self {
            role: args.role.map(Into::into),
            email: args.email,
            name: args.name,
            active: args.active,
            created_at: args.created_at,
        }
    }
}

async fn find_user(controller: &DashboardController, id: u64) -> Result<User, CliError> {
    util::find_record(controller, ResourceName::Users, id, ResourceData::as_users, |u| u.id).await
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &DashboardController,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List(list) => {
            controller.apply_user_filter(list.into()).await?;
            let state = controller.state();
            let users = state
                .get(ResourceName::Users)
                .and_then(ResourceData::as_users)
                .unwrap_or_default();
            let out = output::render_list(global.output, users, |u| UserRow::from(u), |u| {
                u.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create {
            email,
            password,
            name,
            phone,
            role,
        } => {
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ").map_err(util::prompt_err)?,
            };
            let form = UserForm {
                email,
                password: Some(password),
                full_name: name,
                phone,
                role: role.into(),
                active: None,
            };
            controller.user_editor().open_create();
            let outcome = controller.submit_user(&form).await;
            util::report(controller, outcome, global)
        }

        UsersCommand::Update {
            id,
            email,
            password,
            name,
            phone,
            role,
        } => {
            let current = find_user(controller, id).await?;
            let form = UserForm {
                email: email.unwrap_or_else(|| current.email.clone()),
                password,
                full_name: name.or_else(|| current.full_name.clone()),
                phone: phone.or_else(|| current.phone.clone()),
                role: role.map_or(current.role, Into::into),
                active: Some(current.active),
            };
            controller.user_editor().open_edit(current);
            let outcome = controller.submit_user(&form).await;
            util::report(controller, outcome, global)
        }

        UsersCommand::Toggle { id } => {
            let user = find_user(controller, id).await?;
            let outcome = controller.toggle_user_status(&user).await;
            util::report(controller, outcome, global)
        }
    }
}
