//! `metabase_user_permission_group_membership`

use std::sync::Arc;

use async_trait::async_trait;

use super::ResourceHandler;
use crate::client::MetabaseClient;
use crate::error::{ProviderError, Result};
use crate::models::state::required_id;
use crate::models::MembershipState;
use crate::repositories::MembershipRepository;
use crate::schema::{Attribute, Schema};

/// A user's membership in a permission group. Both ends are immutable, so
/// every change replaces the membership.
#[derive(Debug, Clone)]
pub struct MembershipResource {
    repository: MembershipRepository,
}

#[async_trait]
impl ResourceHandler for MembershipResource {
    type State = MembershipState;
    const TYPE_SUFFIX: &'static str = "user_permission_group_membership";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("User Permission group membership")
            .with_attribute("id", Attribute::id().with_description("Membership ID"))
            .with_attribute(
                "user_id",
                Attribute::required_string()
                    .with_description("ID of the user")
                    .requires_replace(),
            )
            .with_attribute(
                "permission_group_id",
                Attribute::required_string()
                    .with_description("ID of the permission group")
                    .requires_replace(),
            )
    }

    fn configure(client: Arc<MetabaseClient>) -> Self {
        Self {
            repository: MembershipRepository::new(client),
        }
    }

    async fn create(&self, planned: MembershipState) -> Result<MembershipState> {
        let user_id = required_id(&planned.user_id, "user_id")?;
        let group_id = required_id(&planned.permission_group_id, "permission_group_id")?;
        Ok(self.repository.create(user_id, group_id).await?.into())
    }

    async fn read(&self, current: MembershipState) -> Result<MembershipState> {
        let id = required_id(&current.id, "id")?;
        Ok(self.repository.get(id).await?.into())
    }

    async fn update(
        &self,
        _prior: MembershipState,
        _planned: MembershipState,
    ) -> Result<MembershipState> {
        Err(ProviderError::Unimplemented(
            "memberships cannot be updated in place".to_string(),
        ))
    }

    async fn delete(&self, current: MembershipState) -> Result<()> {
        let id = required_id(&current.id, "id")?;
        self.repository.delete(id).await
    }
}
