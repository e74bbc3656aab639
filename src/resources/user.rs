//! `metabase_user`
//!
//! Users are never removed: destroying one deactivates it, and `is_active`
//! toggles activation in place.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::{update_id, ResourceHandler};
use crate::client::MetabaseClient;
use crate::error::{ProviderError, Result};
use crate::models::state::{required, required_id};
use crate::models::UserState;
use crate::repositories::UserRepository;
use crate::schema::{Attribute, Schema};

/// A Metabase user account.
#[derive(Debug, Clone)]
pub struct UserResource {
    repository: UserRepository,
}

/// The activation change to apply, if any.
fn activation_change(prior: &UserState, planned: &UserState) -> Option<bool> {
    match (prior.is_active, planned.is_active) {
        (before, Some(after)) if before != Some(after) => Some(after),
        _ => None,
    }
}

#[async_trait]
impl ResourceHandler for UserResource {
    type State = UserState;
    const TYPE_SUFFIX: &'static str = "user";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("User")
            .with_attribute("id", Attribute::id().with_description("User ID"))
            .with_attribute(
                "email",
                Attribute::required_string()
                    .with_description("Email of the user")
                    .requires_replace(),
            )
            .with_attribute(
                "first_name",
                Attribute::optional_string().with_description("First name of the user"),
            )
            .with_attribute(
                "last_name",
                Attribute::optional_string().with_description("Last name of the user"),
            )
            .with_attribute(
                "is_active",
                Attribute::optional_computed_bool()
                    .with_description("Whether the user is active")
                    .with_default(json!(true)),
            )
    }

    fn configure(client: Arc<MetabaseClient>) -> Self {
        Self {
            repository: UserRepository::new(client),
        }
    }

    async fn create(&self, planned: UserState) -> Result<UserState> {
        if planned.is_active == Some(false) {
            return Err(ProviderError::Validation(
                "a user cannot be created inactive".to_string(),
            ));
        }
        let email = required(&planned.email, "email")?;

        let user = self
            .repository
            .create(
                email,
                planned.first_name.as_deref(),
                planned.last_name.as_deref(),
            )
            .await?;
        Ok(user.into())
    }

    async fn read(&self, current: UserState) -> Result<UserState> {
        let id = required_id(&current.id, "id")?;
        Ok(self.repository.get(id).await?.into())
    }

    async fn update(&self, prior: UserState, planned: UserState) -> Result<UserState> {
        let id = update_id(&prior.id, &planned.id)?;
        self.repository
            .update(
                id,
                planned.first_name.as_deref(),
                planned.last_name.as_deref(),
                activation_change(&prior, &planned),
            )
            .await?;

        Ok(UserState {
            id: Some(id.to_string()),
            ..planned
        })
    }

    async fn delete(&self, current: UserState) -> Result<()> {
        let id = required_id(&current.id, "id")?;
        self.repository.deactivate(id).await
    }
}
