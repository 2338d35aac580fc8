// Class type endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::StudioClass;
use crate::requests::{CreateClassRequest, UpdateClassRequest};

impl ApiClient {
    /// `GET /admin/classes`
    pub async fn list_classes(&self) -> Result<Vec<StudioClass>, Error> {
        self.get("admin/classes", &[]).await
    }

    /// `POST /admin/classes`
    pub async fn create_class(&self, req: &CreateClassRequest) -> Result<Option<StudioClass>, Error> {
        self.post("admin/classes", req).await
    }

    /// `PUT /admin/classes/{id}`
    pub async fn update_class(
        &self,
        id: u64,
        req: &UpdateClassRequest,
    ) -> Result<Option<StudioClass>, Error> {
        self.put(&format!("admin/classes/{id}"), req).await
    }
}
