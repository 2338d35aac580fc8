// Package catalogue endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::Package;
use crate::requests::{CreatePackageRequest, UpdatePackageRequest};

impl ApiClient {
    /// `GET /admin/packages`
    pub async fn list_packages(&self) -> Result<Vec<Package>, Error> {
        self.get("admin/packages", &[]).await
    }

    /// `POST /admin/packages`
    pub async fn create_package(&self, req: &CreatePackageRequest) -> Result<Option<Package>, Error> {
        self.post("admin/packages", req).await
    }

    /// `PUT /admin/packages/{id}`
    pub async fn update_package(
        &self,
        id: u64,
        req: &UpdatePackageRequest,
    ) -> Result<Option<Package>, Error> {
        self.put(&format!("admin/packages/{id}"), req).await
    }
}
