//! User listing endpoint

use super::client::ApiClient;
use super::error::ApiResult;
use crate::models::User;

impl ApiClient {
    /// GET /auth/users/ - list all user accounts
    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get("/auth/users/").await
    }
}
