// User endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::User;
use crate::requests::{CreateUserRequest, UpdateUserRequest};

impl ApiClient {
    /// List users, optionally narrowed by server-side filters
    /// (`role`, `email`, `name`, `active`, `created_at`).
    ///
    /// `GET /admin/users`
    pub async fn list_users(&self, filters: &[(&str, String)]) -> Result<Vec<User>, Error> {
        debug!(?filters, "listing users");
        self.get("admin/users", filters).await
    }

    /// Register a new user account.
    ///
    /// `POST /auth/register`
    pub async fn create_user(&self, req: &CreateUserRequest) -> Result<Option<User>, Error> {
        self.post("auth/register", req).await
    }

    /// `PUT /admin/users/{id}`
    pub async fn update_user(
        &self,
        id: u64,
        req: &UpdateUserRequest,
    ) -> Result<Option<User>, Error> {
        self.put(&format!("admin/users/{id}"), req).await
    }

    /// Students who attend the signed-in instructor's classes.
    ///
    /// `GET /instructor/students`
    pub async fn list_students(&self) -> Result<Vec<User>, Error> {
        self.get("instructor/students", &[]).await
    }
}
