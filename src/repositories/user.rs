//! User API operations

use std::sync::Arc;

use tracing::debug;

use crate::client::MetabaseClient;
use crate::error::Result;
use crate::models::{CreateUserRequest, UpdateUserRequest, UserDto};

const USERS: &str = "/api/user";

/// Requests against `/api/user`.
#[derive(Debug, Clone)]
pub struct UserRepository {
    client: Arc<MetabaseClient>,
}

impl UserRepository {
    /// Create a repository sharing `client`.
    pub fn new(client: Arc<MetabaseClient>) -> Self {
        Self { client }
    }

    /// Invite a user. New users are always active.
    pub async fn create(
        &self,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<UserDto> {
        let body = CreateUserRequest {
            email: email.to_string(),
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
        };
        let response = self.client.post(USERS, &body).await?;
        let user: UserDto = MetabaseClient::decode(response, "create").await?;
        debug!(id = user.id, "Created user");
        Ok(user)
    }

    /// Get a user by id.
    pub async fn get(&self, id: i64) -> Result<UserDto> {
        let response = self.client.get(&format!("{}/{}", USERS, id)).await?;
        MetabaseClient::decode(response, "get").await
    }

    /// Update the user's names and toggle activation when `is_active` is set.
    ///
    /// `is_active: None` leaves activation untouched. Metabase only edits
    /// active accounts, so a reactivation goes out before the names and a
    /// deactivation after them.
    pub async fn update(
        &self,
        id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<()> {
        let body = UpdateUserRequest {
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
        };
        if is_active == Some(true) {
            self.reactivate(id).await?;
        }
        self.client.put(&format!("{}/{}", USERS, id), &body).await?;
        if is_active == Some(false) {
            self.deactivate(id).await?;
        }
        Ok(())
    }

    /// Deactivate a user. Metabase never hard-deletes users.
    pub async fn deactivate(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("{}/{}", USERS, id)).await?;
        debug!(id, "Deactivated user");
        Ok(())
    }

    /// Reactivate a deactivated user.
    pub async fn reactivate(&self, id: i64) -> Result<()> {
        self.client
            .put(&format!("{}/{}/reactivate", USERS, id), &serde_json::json!({}))
            .await?;
        debug!(id, "Reactivated user");
        Ok(())
    }
}
