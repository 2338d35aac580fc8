//! Package command handlers.

use tabled::Tabled;

use reformery_core::{DashboardController, Package, PackageForm, Query, ResourceData, ResourceName};

use crate::cli::{GlobalOpts, PackagesArgs, PackagesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Classes")]
    classes: String,
    #[tabled(rename = "Valid (days)")]
    validity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Package> for PackageRow {
    fn from(p: &Package) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            classes: output::or_dash(p.total_classes),
            validity: output::or_dash(p.validity_days),
            price: format!("{:.2}", p.price),
            active: output::yes_no(p.active),
        }
    }
}

pub async fn handle(
    controller: &DashboardController,
    args: PackagesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PackagesCommand::List => {
            let data = util::fetch(controller, ResourceName::Packages, &Query::new()).await?;
            let packages = data.as_packages().unwrap_or_default();
            let out = output::render_list(
                global.output,
                packages,
                |p| PackageRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PackagesCommand::Create {
            name,
            description,
            classes,
            validity_days,
            price,
            inactive,
        } => {
            let form = PackageForm {
                name,
                description,
                total_classes: classes,
                validity_days,
                price,
                active: !inactive,
            };
            controller.package_editor().open_create();
            let outcome = controller.submit_package(&form).await;
            util::report(controller, outcome, global)
        }

        PackagesCommand::Update {
            id,
            name,
            description,
            classes,
            validity_days,
            price,
        } => {
            let current = util::find_record(
                controller,
                ResourceName::Packages,
                id,
                ResourceData::as_packages,
                |p| p.id,
            )
            .await?;
            let form = PackageForm {
                name: name.unwrap_or_else(|| current.name.clone()),
                description: description.or_else(|| current.description.clone()),
                total_classes: classes.or(current.total_classes).unwrap_or_default(),
                validity_days: validity_days.or(current.validity_days).unwrap_or_default(),
                price: price.unwrap_or(current.price),
                active: current.active,
            };
            controller.package_editor().open_edit(current);
            let outcome = controller.submit_package(&form).await;
            util::report(controller, outcome, global)
        }

        PackagesCommand::Toggle { id } => {
            let package = util::find_record(
                controller,
                ResourceName::Packages,
                id,
                ResourceData::as_packages,
                |p| p.id,
            )
            .await?;
            let outcome = controller.toggle_package_status(&package).await;
            util::report(controller, outcome, global)
        }
    }
}
