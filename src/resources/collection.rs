//! `metabase_collection`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::{update_id, ResourceHandler};
use crate::client::MetabaseClient;
use crate::error::{ProviderError, Result};
use crate::models::state::{parse_id, required, required_id};
use crate::models::{CollectionPatch, CollectionState};
use crate::repositories::CollectionRepository;
use crate::schema::{Attribute, Schema};

/// Collections are never hard-deleted; destroying one archives it.
#[derive(Debug, Clone)]
pub struct CollectionResource {
    repository: CollectionRepository,
}

fn parent_id(state: &CollectionState) -> Result<Option<i64>> {
    state
        .parent_id
        .as_deref()
        .map(|id| parse_id(id, "parent_id"))
        .transpose()
}

/// Partial body holding only the fields that differ between `prior` and `planned`.
fn diff(prior: &CollectionState, planned: &CollectionState) -> Result<CollectionPatch> {
    let mut patch = CollectionPatch::default();
    if planned.name.is_some() && planned.name != prior.name {
        patch.name = planned.name.clone();
    }
    if planned.parent_id != prior.parent_id {
        patch.parent_id = Some(parent_id(planned)?);
    }
    if planned.archived.is_some() && planned.archived != prior.archived {
        patch.archived = planned.archived;
    }
    Ok(patch)
}

#[async_trait]
impl ResourceHandler for CollectionResource {
    type State = CollectionState;
    const TYPE_SUFFIX: &'static str = "collection";

    fn schema() -> Schema {
        Schema::v0()
            .with_description("collection")
            .with_attribute("id", Attribute::id().with_description("Collection ID"))
            .with_attribute(
                "name",
                Attribute::required_string().with_description("Name of the collection"),
            )
            .with_attribute(
                "parent_id",
                Attribute::optional_string().with_description("ID of the parent collection"),
            )
            .with_attribute(
                "archived",
                Attribute::optional_computed_bool()
                    .with_description("Whether the collection is archived")
                    .with_default(json!(false)),
            )
    }

    fn configure(client: Arc<MetabaseClient>) -> Self {
        Self {
            repository: CollectionRepository::new(client),
        }
    }

    async fn create(&self, planned: CollectionState) -> Result<CollectionState> {
        if planned.archived == Some(true) {
            return Err(ProviderError::Validation(
                "a collection cannot be created archived".to_string(),
            ));
        }
        let name = required(&planned.name, "name")?;
        let parent_id = parent_id(&planned)?;

        let collection = self.repository.create(name, parent_id, false).await?;
        Ok(collection.into())
    }

    async fn read(&self, current: CollectionState) -> Result<CollectionState> {
        let id = required_id(&current.id, "id")?;
        Ok(self.repository.get(id).await?.into())
    }

    async fn update(
        &self,
        prior: CollectionState,
        planned: CollectionState,
    ) -> Result<CollectionState> {
        let id = update_id(&prior.id, &planned.id)?;
        let patch = diff(&prior, &planned)?;
        if !patch.is_empty() {
            self.repository.update(id, &patch).await?;
        }

        Ok(CollectionState {
            id: Some(id.to_string()),
            ..planned
        })
    }

    async fn delete(&self, current: CollectionState) -> Result<()> {
        let id = required_id(&current.id, "id")?;
        let patch = CollectionPatch {
            archived: Some(true),
            ..Default::default()
        };
        self.repository.update(id, &patch).await?;
        Ok(())
    }
}
