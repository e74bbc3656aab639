//! Collection API operations

use std::sync::Arc;

use tracing::debug;

use crate::client::MetabaseClient;
use crate::error::Result;
use crate::models::{CollectionDto, CollectionPatch, CreateCollectionRequest};

const COLLECTIONS: &str = "/api/collection";

/// Requests against `/api/collection`.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    client: Arc<MetabaseClient>,
}

impl CollectionRepository {
    /// Create a repository sharing `client`.
    pub fn new(client: Arc<MetabaseClient>) -> Self {
        Self { client }
    }

    /// Create a collection.
    pub async fn create(
        &self,
        name: &str,
        parent_id: Option<i64>,
        archived: bool,
    ) -> Result<CollectionDto> {
        let body = CreateCollectionRequest {
            name: name.to_string(),
            parent_id,
            archived,
        };
        let response = self.client.post(COLLECTIONS, &body).await?;
        let collection: CollectionDto = MetabaseClient::decode(response, "create").await?;
        debug!(id = collection.id, "Created collection");
        Ok(collection)
    }

    /// Get a collection by id.
    pub async fn get(&self, id: i64) -> Result<CollectionDto> {
        let response = self.client.get(&format!("{}/{}", COLLECTIONS, id)).await?;
        MetabaseClient::decode(response, "get").await
    }

    /// Apply a partial update. Any 2xx status is success; the body is ignored.
    pub async fn update(&self, id: i64, patch: &CollectionPatch) -> Result<()> {
        self.client
            .put(&format!("{}/{}", COLLECTIONS, id), patch)
            .await?;
        debug!(id, "Updated collection");
        Ok(())
    }
}
