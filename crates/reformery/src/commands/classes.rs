//! Class type command handlers.

use tabled::Tabled;

use reformery_core::{ClassForm, DashboardController, Query, ResourceData, ResourceName, StudioClass};

use crate::cli::{ClassesArgs, ClassesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ClassRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Minutes")]
    duration: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Intensity")]
    intensity: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&StudioClass> for ClassRow {
    fn from(c: &StudioClass) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            duration: output::or_dash(c.duration),
            capacity: output::or_dash(c.max_capacity),
            category: output::or_dash(c.category.as_deref()),
            intensity: output::or_dash(c.intensity_level.as_deref()),
            active: output::yes_no(c.active),
        }
    }
}

async fn find_class(controller: &DashboardController, id: u64) -> Result<StudioClass, CliError> {
    util::find_record(controller, ResourceName::Classes, id, ResourceData::as_classes, |c| c.id)
        .await
}

pub async fn handle(
    controller: &DashboardController,
    args: ClassesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClassesCommand::List => {
            let data = util::fetch(controller, ResourceName::Classes, &Query::new()).await?;
            let classes = data.as_classes().unwrap_or_default();
            let out = output::render_list(
                global.output,
                classes,
                |c| ClassRow::from(c),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClassesCommand::Create {
            name,
            description,
            duration,
            capacity,
            category,
            intensity,
        } => {
            let form = ClassForm {
                name,
                description,
                duration,
                max_capacity: capacity,
                category,
                intensity_level: intensity,
                active: true,
            };
            controller.class_editor().open_create();
            let outcome = controller.submit_class(&form).await;
            util::report(controller, outcome, global)
        }

        ClassesCommand::Update {
            id,
            name,
            description,
            duration,
            capacity,
            category,
            intensity,
        } => {
            let current = find_class(controller, id).await?;
            let form = ClassForm {
                name: name.unwrap_or_else(|| current.name.clone()),
                description: description.or_else(|| current.description.clone()),
                duration: duration.or(current.duration).unwrap_or_default(),
                max_capacity: capacity.or(current.max_capacity).unwrap_or_default(),
                category: category.or_else(|| current.category.clone()),
                intensity_level: intensity.or_else(|| current.intensity_level.clone()),
                active: current.active,
            };
            controller.class_editor().open_edit(current);
            let outcome = controller.submit_class(&form).await;
            util::report(controller, outcome, global)
        }

        ClassesCommand::Toggle { id } => {
            let class = find_class(controller, id).await?;
            let outcome = controller.toggle_class_status(&class).await;
            util::report(controller, outcome, global)
        }
    }
}
