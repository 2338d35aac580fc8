// Statistics endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{DashboardSummary, Statistics, SummaryPayload};

impl ApiClient {
    /// Per-entity counters for the admin overview.
    ///
    /// `GET /admin/statistics`
    pub async fn statistics(&self) -> Result<Statistics, Error> {
        self.get("admin/statistics", &[]).await
    }

    /// Headline numbers for the dashboard header.
    ///
    /// `GET /admin/stats`
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, Error> {
        let payload: SummaryPayload = self.get("admin/stats", &[]).await?;
        Ok(DashboardSummary::from(payload))
    }
}
