//! `metabase_permission_group`

use std::sync::Arc;

use async_trait::async_trait;

use super::{update_id, ResourceHandler};
use crate::client::MetabaseClient;
use crate::error::Result;
use crate::models::state::{required, required_id};
use crate::models::PermissionGroupState;
use crate::repositories::PermissionGroupRepository;
use crate::schema::{Attribute, Schema};

/// A named permission group.
#[derive(Debug, Clone)]
pub struct PermissionGroupResource {
    repository: PermissionGroupRepository,
}

#[async_trait]
impl ResourceHandler for PermissionGroupResource {
    type State = PermissionGroupState;
    const TYPE_SUFFIX: &'static str = "permission_group";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("Permission Group")
            .with_attribute("id", Attribute::id().with_description("Group ID"))
            .with_attribute(
                "name",
                Attribute::required_string().with_description("Name of the group"),
            )
    }

    fn configure(client: Arc<MetabaseClient>) -> Self {
        Self {
            repository: PermissionGroupRepository::new(client),
        }
    }

    async fn create(&self, planned: PermissionGroupState) -> Result<PermissionGroupState> {
        let name = required(&planned.name, "name")?;
        Ok(self.repository.create(name).await?.into())
    }

    async fn read(&self, current: PermissionGroupState) -> Result<PermissionGroupState> {
        let id = required_id(&current.id, "id")?;
        Ok(self.repository.get(id).await?.into())
    }

    async fn update(
        &self,
        prior: PermissionGroupState,
        planned: PermissionGroupState,
    ) -> Result<PermissionGroupState> {
        let id = update_id(&prior.id, &planned.id)?;
        let name = required(&planned.name, "name")?;
        if planned.name != prior.name {
            self.repository.update(id, name).await?;
        }

        Ok(PermissionGroupState {
            id: Some(id.to_string()),
            ..planned
        })
    }

    async fn delete(&self, current: PermissionGroupState) -> Result<()> {
        let id = required_id(&current.id, "id")?;
        self.repository.delete(id).await
    }
}
