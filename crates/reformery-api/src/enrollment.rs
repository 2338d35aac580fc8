// User-package and reservation endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Reservation, UserPackage};
use crate::requests::{
    AdjustClassesRequest, AssignPackageRequest, AttendanceRequest, UpdateUserPackageRequest,
};

impl ApiClient {
    // ── User packages ────────────────────────────────────────────────

    /// `GET /admin/user-packages`
    pub async fn list_user_packages(&self) -> Result<Vec<UserPackage>, Error> {
        self.get("admin/user-packages", &[]).await
    }

    /// `GET /admin/user-packages/user/{user_id}`
    pub async fn list_user_packages_for(&self, user_id: u64) -> Result<Vec<UserPackage>, Error> {
        self.get(&format!("admin/user-packages/user/{user_id}"), &[])
            .await
    }

    /// Packages owned by the signed-in user.
    ///
    /// `GET /user-packages/my-packages`
    pub async fn list_my_packages(&self) -> Result<Vec<UserPackage>, Error> {
        self.get("user-packages/my-packages", &[]).await
    }

    /// `POST /admin/user-packages`
    pub async fn assign_package(
        &self,
        req: &AssignPackageRequest,
    ) -> Result<Option<UserPackage>, Error> {
        self.post("admin/user-packages", req).await
    }

    /// `PUT /admin/user-packages/{id}`
    pub async fn update_user_package(
        &self,
        id: u64,
        req: &UpdateUserPackageRequest,
    ) -> Result<Option<UserPackage>, Error> {
        self.put(&format!("admin/user-packages/{id}"), req).await
    }

    /// `DELETE /admin/user-packages/{id}`
    pub async fn remove_user_package(&self, id: u64) -> Result<Option<UserPackage>, Error> {
        self.delete(&format!("admin/user-packages/{id}")).await
    }

    /// Add (positive delta) or remove class credits, e.g. birthday gifts.
    ///
    /// `PATCH /admin/user-packages/{id}/adjust-classes`
    pub async fn adjust_classes(
        &self,
        id: u64,
        req: &AdjustClassesRequest,
    ) -> Result<Option<UserPackage>, Error> {
        self.patch(&format!("admin/user-packages/{id}/adjust-classes"), req)
            .await
    }

    // ── Reservations ─────────────────────────────────────────────────

    /// `GET /admin/reservations`
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, Error> {
        self.get("admin/reservations", &[]).await
    }

    /// `GET /admin/reservations/schedule/{schedule_id}`
    pub async fn list_reservations_for_schedule(
        &self,
        schedule_id: u64,
    ) -> Result<Vec<Reservation>, Error> {
        self.get(&format!("admin/reservations/schedule/{schedule_id}"), &[])
            .await
    }

    /// `GET /reservations/my-reservations`
    pub async fn list_my_reservations(&self) -> Result<Vec<Reservation>, Error> {
        self.get("reservations/my-reservations", &[]).await
    }

    /// `PUT /admin/reservations/{id}/attendance`
    pub async fn mark_attendance(
        &self,
        id: u64,
        attended: bool,
    ) -> Result<Option<Reservation>, Error> {
        self.put(
            &format!("admin/reservations/{id}/attendance"),
            &AttendanceRequest { attended },
        )
        .await
    }

    /// Cancel one of the signed-in user's reservations.
    ///
    /// `DELETE /reservations/{id}`
    pub async fn cancel_reservation(&self, id: u64) -> Result<Option<Reservation>, Error> {
        self.delete(&format!("reservations/{id}")).await
    }
}
