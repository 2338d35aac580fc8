//! Dashboard command handler.

use serde::Serialize;
use tabled::Tabled;

use reformery_core::aggregate::{admin_resources, client_resources, instructor_resources};
use reformery_core::{AggregateState, DashboardController, DashboardSummary, Query, ResourceName};

use crate::cli::{DashboardView, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Resource preset behind each dashboard view.
pub fn resources(view: DashboardView) -> Vec<(ResourceName, Query)> {
    match view {
        DashboardView::Admin => admin_resources(),
        DashboardView::Client => client_resources(chrono::Local::now().date_naive()),
        DashboardView::Instructor => instructor_resources(),
    }
}

#[derive(Serialize)]
struct DashboardReport<'a> {
    summary: Option<&'a DashboardSummary>,
    #[serde(flatten)]
    state: &'a AggregateState,
}

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Resource")]
    name: String,
    #[tabled(rename = "Records")]
    records: usize,
    #[tabled(rename = "Status")]
    status: String,
}

fn detail(report: &DashboardReport<'_>) -> String {
    let state = report.state;
    let mut lines = Vec::new();

    if let Some(summary) = report.summary {
        lines.push(format!("Users:              {}", summary.total_users));
        lines.push(format!("Active packages:    {}", summary.active_packages));
        lines.push(format!("Classes:            {}", summary.scheduled_classes));
        lines.push(format!("Sessions (month):   {}", summary.active_schedules));
        lines.push(format!("Reservations:       {}", summary.total_reservations));
        lines.push(format!("Revenue:            {:.2}", summary.total_revenue));
        lines.push(String::new());
    }

    let rows: Vec<ResourceRow> = state
        .resources
        .iter()
        .map(|(name, data)| ResourceRow {
            name: name.to_string(),
            records: data.len(),
            status: state
                .failures
                .get(name)
                .map_or_else(|| "ok".into(), |info| format!("failed: {}", info.message)),
        })
        .collect();
    lines.push(output::render_table(&rows));

    if let Some(loaded_at) = state.loaded_at {
        lines.push(format!(
            "Loaded {} (generation {})",
            loaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            state.generation
        ));
    }
    lines.join("\n")
}

pub async fn handle(controller: &DashboardController, global: &GlobalOpts) -> Result<(), CliError> {
    let state = controller.mount().await;

    // Nothing loaded at all: report the systemic error instead of a
    // table of empty defaults.
    if let Some(error) = state.error.clone() {
        return Err(error.into());
    }
    if state.is_partial() {
        tracing::warn!(
            failed = state.failures.len(),
            "dashboard loaded with partial data"
        );
    }

    let summary = controller.summary();
    let report = DashboardReport {
        summary: summary.as_ref(),
        state: &state,
    };
    let out = output::render_single(global.output, &report, detail, |r| {
        r.state
            .resources
            .iter()
            .map(|(name, data)| format!("{name}\t{}", data.len()))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
