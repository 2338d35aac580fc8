// Schedule endpoints
//
// Admin CRUD lives under `/admin/schedules`; the public timetable and the
// instructor's own list are separate read-only endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::Schedule;
use crate::requests::{CreateScheduleRequest, UpdateScheduleRequest};

impl ApiClient {
    /// `GET /admin/schedules`
    pub async fn list_schedules(&self) -> Result<Vec<Schedule>, Error> {
        self.get("admin/schedules", &[]).await
    }

    /// Bookable schedules, narrowed by `start_date` / `end_date`.
    ///
    /// `GET /schedules/public`
    pub async fn list_public_schedules(
        &self,
        range: &[(&str, String)],
    ) -> Result<Vec<Schedule>, Error> {
        debug!(?range, "listing public schedules");
        self.get("schedules/public", range).await
    }

    /// `GET /schedules/my-schedules`
    pub async fn list_my_schedules(&self) -> Result<Vec<Schedule>, Error> {
        self.get("schedules/my-schedules", &[]).await
    }

    /// `POST /admin/schedules`
    pub async fn create_schedule(
        &self,
        req: &CreateScheduleRequest,
    ) -> Result<Option<Schedule>, Error> {
        self.post("admin/schedules", req).await
    }

    /// `PUT /admin/schedules/{id}`
    pub async fn update_schedule(
        &self,
        id: u64,
        req: &UpdateScheduleRequest,
    ) -> Result<Option<Schedule>, Error> {
        self.put(&format!("admin/schedules/{id}"), req).await
    }

    /// Cancel a schedule. The server keeps the record with status
    /// `cancelled`.
    ///
    /// `DELETE /admin/schedules/{id}`
    pub async fn cancel_schedule(&self, id: u64) -> Result<Option<Schedule>, Error> {
        self.delete(&format!("admin/schedules/{id}")).await
    }
}
