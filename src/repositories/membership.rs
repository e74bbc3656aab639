//! User/permission-group membership API operations
//!
//! Metabase has no single-membership endpoint: create answers with the
//! memberships of the whole group and get lists every membership keyed by
//! group, so both scan the response for the entry they want.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::client::MetabaseClient;
use crate::error::{ProviderError, Result};
use crate::models::{CreateMembershipRequest, MembershipDto};

const MEMBERSHIPS: &str = "/api/permissions/membership";

/// Requests against `/api/permissions/membership`.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    client: Arc<MetabaseClient>,
}

impl MembershipRepository {
    /// Create a repository sharing `client`.
    pub fn new(client: Arc<MetabaseClient>) -> Self {
        Self { client }
    }

    /// Add a user to a group and return the new membership.
    pub async fn create(&self, user_id: i64, group_id: i64) -> Result<MembershipDto> {
        let body = CreateMembershipRequest { user_id, group_id };
        let response = self.client.post(MEMBERSHIPS, &body).await?;
        let memberships: Vec<MembershipDto> = MetabaseClient::decode(response, "create").await?;
        debug!(count = memberships.len(), "Scanning group memberships");

        memberships
            .into_iter()
            .find(|m| m.user_id == user_id && m.group_id == group_id)
            .ok_or_else(|| {
                ProviderError::NotFound(format!(
                    "Membership not found for user_id {} and group_id {}",
                    user_id, group_id
                ))
            })
    }

    /// Find a membership by id.
    pub async fn get(&self, id: i64) -> Result<MembershipDto> {
        let response = self.client.get(MEMBERSHIPS).await?;
        let by_group: BTreeMap<String, Vec<MembershipDto>> =
            MetabaseClient::decode(response, "get").await?;

        by_group
            .into_values()
            .flatten()
            .find(|m| m.membership_id == id)
            .ok_or_else(|| ProviderError::NotFound(format!("Membership with ID {} not found", id)))
    }

    /// Remove a membership.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .delete(&format!("{}/{}", MEMBERSHIPS, id))
            .await?;
        Ok(())
    }
}
