//! Handlers for packages held by members.

use tabled::Tabled;

use reformery_core::{AssignPackageRequest, DashboardController, Query, ResourceName, UserPackage};

use crate::cli::{GlobalOpts, MembershipsArgs, MembershipsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct MembershipRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Package")]
    package: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&UserPackage> for MembershipRow {
    fn from(m: &UserPackage) -> Self {
        Self {
            id: m.id,
            user: output::or_dash(m.user_id),
            package: m
                .package_name
                .clone()
                .or_else(|| m.package_id.map(|id| format!("#{id}")))
                .unwrap_or_else(|| "-".into()),
            remaining: output::or_dash(m.remaining_classes),
            expires: output::or_dash(m.expiry_date.as_deref()),
            status: output::or_dash(m.status.as_deref()),
        }
    }
}

pub async fn handle(
    controller: &DashboardController,
    args: MembershipsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MembershipsCommand::List { user } => {
            let mut query = Query::new();
            if let Some(user_id) = user {
                query.push("user_id", user_id.to_string());
            }
            let data = util::fetch(controller, ResourceName::UserPackages, &query).await?;
            let memberships = data.as_user_packages().unwrap_or_default();
            let out = output::render_list(
                global.output,
                memberships,
                |m| MembershipRow::from(m),
                |m| m.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MembershipsCommand::Assign {
            user,
            package,
            price_paid,
            notes,
        } => {
            let request = AssignPackageRequest {
                user_id: user,
                package_id: package,
                price_paid,
                notes,
            };
            let outcome = controller.assign_package(request).await;
            util::report(controller, outcome, global)
        }

        MembershipsCommand::Remove { id } => {
            if !util::confirm(&format!("Remove membership {id} from its user?"), global.yes)? {
                return Ok(());
            }
            let outcome = controller.remove_user_package(id).await;
            util::report(controller, outcome, global)
        }

        MembershipsCommand::AddClasses { id, count, reason } => {
            let outcome = controller.add_extra_classes(id, count, &reason).await;
            util::report(controller, outcome, global)
        }
    }
}
