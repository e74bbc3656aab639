//! Permission group API operations

use std::sync::Arc;

use tracing::debug;

use crate::client::MetabaseClient;
use crate::error::Result;
use crate::models::{PermissionGroupDto, PermissionGroupRequest};

const GROUPS: &str = "/api/permissions/group";

/// Requests against `/api/permissions/group`.
#[derive(Debug, Clone)]
pub struct PermissionGroupRepository {
    client: Arc<MetabaseClient>,
}

impl PermissionGroupRepository {
    /// Create a repository sharing `client`.
    pub fn new(client: Arc<MetabaseClient>) -> Self {
        Self { client }
    }

    /// Create a permission group.
    pub async fn create(&self, name: &str) -> Result<PermissionGroupDto> {
        let body = PermissionGroupRequest {
            name: name.to_string(),
        };
        let response = self.client.post(GROUPS, &body).await?;
        let group: PermissionGroupDto = MetabaseClient::decode(response, "create").await?;
        debug!(id = group.id, "Created permission group");
        Ok(group)
    }

    /// Get a permission group by id.
    pub async fn get(&self, id: i64) -> Result<PermissionGroupDto> {
        let response = self.client.get(&format!("{}/{}", GROUPS, id)).await?;
        MetabaseClient::decode(response, "get").await
    }

    /// Rename a permission group. Any 2xx status is success.
    pub async fn update(&self, id: i64, name: &str) -> Result<()> {
        let body = PermissionGroupRequest {
            name: name.to_string(),
        };
        self.client.put(&format!("{}/{}", GROUPS, id), &body).await?;
        debug!(id, "Renamed permission group");
        Ok(())
    }

    /// Delete a permission group. Any 2xx status is success.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("{}/{}", GROUPS, id)).await?;
        Ok(())
    }
}
