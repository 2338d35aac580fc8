//! Command dispatch: bridges CLI args -> DashboardController -> output.

pub mod classes;
pub mod config_cmd;
pub mod dashboard;
pub mod memberships;
pub mod packages;
pub mod reservations;
pub mod schedules;
pub mod session;
pub mod users;
pub mod util;

use reformery_core::DashboardController;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &DashboardController,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Dashboard(_) => dashboard::handle(controller, global).await,
        Command::Users(args) => users::handle(controller, args, global).await,
        Command::Packages(args) => packages::handle(controller, args, global).await,
        Command::Classes(args) => classes::handle(controller, args, global).await,
        Command::Schedules(args) => schedules::handle(controller, args, global).await,
        Command::Memberships(args) => memberships::handle(controller, args, global).await,
        Command::Reservations(args) => reservations::handle(controller, args, global).await,
        // Handled before dispatch
        Command::Login(_) | Command::Logout | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Internal("command does not use the dashboard".into()))
        }
    }
}
