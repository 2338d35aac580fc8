//! Timetable command handlers.

use std::sync::Arc;

use tabled::Tabled;

use reformery_core::{
    DashboardController, FilterController, Query, ResourceData, ResourceFetcher, ResourceName,
    Schedule, ScheduleFilter, ScheduleForm,
};

use crate::cli::{GlobalOpts, SchedulesArgs, SchedulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Instructor")]
    instructor: String,
    #[tabled(rename = "Booked")]
    booked: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Schedule> for ScheduleRow {
    fn from(s: &Schedule) -> Self {
        Self {
            id: s.id,
            date: output::or_dash(s.date),
            time: format!(
                "{}-{}",
                s.start_time.as_deref().unwrap_or("?"),
                s.end_time.as_deref().unwrap_or("?")
            ),
            class: s
                .class_name
                .clone()
                .or_else(|| s.class_id.map(|id| format!("#{id}")))
                .unwrap_or_else(|| "-".into()),
            instructor: s
                .instructor_name
                .clone()
                .or_else(|| s.instructor_id.map(|id| format!("#{id}")))
                .unwrap_or_else(|| "-".into()),
            booked: format!(
                "{}/{}",
                s.current_reservations.unwrap_or_default(),
                output::or_dash(s.max_capacity)
            ),
            status: s.status.to_string(),
        }
    }
}

fn missing(field: &str, id: u64) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: format!("schedule {id} has no {field}; pass --{field}"),
    }
}

pub async fn handle(
    controller: &DashboardController,
    args: SchedulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SchedulesCommand::List { public, from, to } => {
            let data = if public {
                let filter: FilterController<ScheduleFilter> =
                    FilterController::new(ResourceFetcher::new(Arc::clone(controller.client())));
                filter
                    .set_criteria(ScheduleFilter {
                        start_date: from,
                        end_date: to,
                    })
                    .await?
            } else {
                util::fetch(controller, ResourceName::Schedules, &Query::new()).await?
            };
            let schedules = data.as_schedules().unwrap_or_default();
            let out = output::render_list(
                global.output,
                schedules,
                |s| ScheduleRow::from(s),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SchedulesCommand::Create {
            class,
            instructor,
            date,
            start,
            end,
            capacity,
            notes,
        } => {
            let form = ScheduleForm {
                class_id: class,
                instructor_id: instructor,
                date,
                start_time: start,
                end_time: end,
                max_capacity: capacity,
                notes,
                status: None,
            };
            controller.schedule_editor().open_create();
            let outcome = controller.submit_schedule(&form).await;
            util::report(controller, outcome, global)
        }

        SchedulesCommand::Update {
            id,
            class,
            instructor,
            date,
            start,
            end,
            capacity,
            status,
            notes,
        } => {
            let current = util::find_record(
                controller,
                ResourceName::Schedules,
                id,
                ResourceData::as_schedules,
                |s| s.id,
            )
            .await?;
            let form = ScheduleForm {
                class_id: class
                    .or(current.class_id)
                    .ok_or_else(|| missing("class", id))?,
                instructor_id: instructor
                    .or(current.instructor_id)
                    .ok_or_else(|| missing("instructor", id))?,
                date: date.or(current.date).ok_or_else(|| missing("date", id))?,
                start_time: start
                    .or_else(|| current.start_time.clone())
                    .ok_or_else(|| missing("start", id))?,
                end_time: end
                    .or_else(|| current.end_time.clone())
                    .ok_or_else(|| missing("end", id))?,
                max_capacity: capacity.or(current.max_capacity).unwrap_or_default(),
                notes: notes.or_else(|| current.notes.clone()),
                status: Some(status.map_or(current.status, Into::into)),
            };
            controller.schedule_editor().open_edit(current);
            let outcome = controller.submit_schedule(&form).await;
            util::report(controller, outcome, global)
        }

        SchedulesCommand::Cancel { id } => {
            if !util::confirm(&format!("Cancel schedule {id}?"), global.yes)? {
                return Ok(());
            }
            let outcome = controller.cancel_schedule(id).await;
            util::report(controller, outcome, global)
        }
    }
}
