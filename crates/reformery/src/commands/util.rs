//! Shared helpers for command handlers.

use std::sync::Arc;

use reformery_core::{
    DashboardController, MutationError, MutationResult, Query, ResourceData, ResourceFetcher,
    ResourceName,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Fetch `name` and pick the record with `id`.
pub async fn find_record<T: Clone>(
    controller: &DashboardController,
    name: ResourceName,
    id: u64,
    records: impl Fn(&ResourceData) -> Option<&[T]>,
    id_of: impl Fn(&T) -> u64,
) -> Result<T, CliError> {
    let fetcher = ResourceFetcher::new(Arc::clone(controller.client()));
    let data = fetcher.fetch(name, &Query::new()).await?;
    records(&data)
        .and_then(|rows| rows.iter().find(|r| id_of(r) == id).cloned())
        .ok_or_else(|| CliError::NotFound {
            resource_type: name.to_string(),
            identifier: id.to_string(),
            list_command: match name {
                ResourceName::UserPackages => "memberships list".into(),
                _ => format!("{name} list"),
            },
        })
}

/// Fetch one resource without touching the dashboard aggregate.
pub async fn fetch(
    controller: &DashboardController,
    name: ResourceName,
    query: &Query,
) -> Result<ResourceData, CliError> {
    let fetcher = ResourceFetcher::new(Arc::clone(controller.client()));
    Ok(fetcher.fetch(name, query).await?)
}

/// Report a mutation outcome: the banner goes to stderr, the echoed
/// record (if any) to stdout in structured formats.
pub fn report(
    controller: &DashboardController,
    outcome: Result<MutationResult, MutationError>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = outcome?;
    if let Some(notification) = controller.notifications().current() {
        output::print_notification(&notification, global.color, global.quiet);
    }
    if global.output.is_structured() && result != MutationResult::Ok {
        let out = output::render_single(global.output, &result, |_| String::new(), |_| String::new())?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
