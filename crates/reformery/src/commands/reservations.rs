//! Reservation command handlers.

use tabled::Tabled;

use reformery_core::{DashboardController, Query, Reservation, ResourceName};

use crate::cli::{GlobalOpts, ReservationsArgs, ReservationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Attended")]
    attended: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id,
            user: output::or_dash(r.user_id),
            schedule: output::or_dash(r.schedule_id),
            status: output::or_dash(r.status.as_deref()),
            attended: r.attended.map_or_else(|| "-".into(), output::yes_no),
        }
    }
}

pub async fn handle(
    controller: &DashboardController,
    args: ReservationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReservationsCommand::List { schedule } => {
            let mut query = Query::new();
            if let Some(schedule_id) = schedule {
                query.push("schedule_id", schedule_id.to_string());
            }
            let data = util::fetch(controller, ResourceName::Reservations, &query).await?;
            let reservations = data.as_reservations().unwrap_or_default();
            let out = output::render_list(
                global.output,
                reservations,
                |r| ReservationRow::from(r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReservationsCommand::Attend { id, absent } => {
            let outcome = controller.mark_attendance(id, !absent).await;
            util::report(controller, outcome, global)
        }
    }
}
