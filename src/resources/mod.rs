//! Resource shims.
//!
//! Each entity supplies a [`ResourceHandler`]: its schema, how it is built from
//! the shared client, and the bodies of the four verbs on typed state. The
//! generic [`Resource`] wraps a handler and does everything else: JSON
//! conversion, validation, planning, import, the configured/unconfigured
//! lifecycle and logging. The provider only sees [`DynamicResource`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::client::MetabaseClient;
use crate::error::{ProviderError, Result};
use crate::models::state::required_id;
use crate::plan::plan_resource_change;
use crate::schema::{Diagnostic, Schema};
use crate::types::{ImportedResource, PlanResult};
use crate::validation::validate;

mod collection;
mod membership;
mod permission_group;
mod user;

pub use collection::CollectionResource;
pub use membership::MembershipResource;
pub use permission_group::PermissionGroupResource;
pub use user::UserResource;

/// Prefix of every resource type name.
pub const TYPE_PREFIX: &str = "metabase";

/// The per-entity half of a resource.
#[async_trait]
pub trait ResourceHandler: Send + Sync + Sized + 'static {
    /// Typed resource state.
    type State: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Type name without the provider prefix, e.g. `collection`.
    const TYPE_SUFFIX: &'static str;

    /// Attribute schema of the resource.
    fn schema() -> Schema;

    /// Build the handler once the provider has a client.
    fn configure(client: Arc<MetabaseClient>) -> Self;

    /// Create the remote entity and return its state.
    async fn create(&self, planned: Self::State) -> Result<Self::State>;

    /// Fetch the remote entity.
    async fn read(&self, current: Self::State) -> Result<Self::State>;

    /// Apply `planned` to the remote entity and return the new state.
    async fn update(&self, prior: Self::State, planned: Self::State) -> Result<Self::State>;

    /// Remove the remote entity.
    async fn delete(&self, current: Self::State) -> Result<()>;
}

/// Object-safe view of a resource, as stored in the provider registry.
#[async_trait]
pub trait DynamicResource: Send + Sync {
    /// Full type name, e.g. `metabase_collection`.
    fn type_name(&self) -> String;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Bind the resource to a client.
    async fn configure(&self, client: Arc<MetabaseClient>);

    /// Validate a resource configuration against the schema.
    fn validate(&self, config: &Value) -> Vec<Diagnostic>;

    /// Compute the planned state.
    fn plan(&self, prior: Option<&Value>, proposed: &Value) -> PlanResult;

    /// Create the resource.
    async fn create(&self, planned: Value) -> Result<Value>;

    /// Read the resource. `None` means it no longer exists.
    async fn read(&self, current: Value) -> Result<Option<Value>>;

    /// Update the resource.
    async fn update(&self, prior: Value, planned: Value) -> Result<Value>;

    /// Delete the resource.
    async fn delete(&self, current: Value) -> Result<()>;

    /// State for an imported resource: the id, every other attribute `null`.
    fn import(&self, id: &str) -> ImportedResource;
}

/// Generic resource built around a [`ResourceHandler`].
pub struct Resource<H: ResourceHandler> {
    handler: RwLock<Option<H>>,
    _marker: PhantomData<fn() -> H>,
}

impl<H: ResourceHandler> Default for Resource<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ResourceHandler> Resource<H> {
    /// Create an unconfigured resource.
    pub fn new() -> Self {
        Self {
            handler: RwLock::new(None),
            _marker: PhantomData,
        }
    }

    /// Whether [`DynamicResource::configure`] has run.
    pub async fn is_configured(&self) -> bool {
        self.handler.read().await.is_some()
    }

    fn full_type_name() -> String {
        format!("{}_{}", TYPE_PREFIX, H::TYPE_SUFFIX)
    }

    fn from_value(value: Value) -> Result<H::State> {
        serde_json::from_value(value).map_err(|e| {
            ProviderError::Validation(format!("invalid {} state: {}", Self::full_type_name(), e))
        })
    }

    fn to_value(state: &H::State) -> Result<Value> {
        Ok(serde_json::to_value(state)?)
    }
}

/// Id of the entity being updated: the planned id, or the prior one if the plan left it unknown.
pub(crate) fn update_id(prior: &Option<String>, planned: &Option<String>) -> Result<i64> {
    required_id(if planned.is_some() { planned } else { prior }, "id")
}

fn not_configured() -> ProviderError {
    ProviderError::Configuration("provider has not been configured".to_string())
}

#[async_trait]
impl<H: ResourceHandler> DynamicResource for Resource<H> {
    fn type_name(&self) -> String {
        Self::full_type_name()
    }

    fn schema(&self) -> Schema {
        H::schema()
    }

    async fn configure(&self, client: Arc<MetabaseClient>) {
        *self.handler.write().await = Some(H::configure(client));
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        validate(&H::schema(), config)
    }

    fn plan(&self, prior: Option<&Value>, proposed: &Value) -> PlanResult {
        plan_resource_change(&H::schema(), prior, proposed)
    }

    #[instrument(skip_all, fields(resource = H::TYPE_SUFFIX))]
    async fn create(&self, planned: Value) -> Result<Value> {
        let guard = self.handler.read().await;
        let handler = guard.as_ref().ok_or_else(not_configured)?;

        match handler.create(Self::from_value(planned)?).await {
            Ok(state) => {
                info!("Resource created");
                Self::to_value(&state)
            }
            Err(e) => {
                error!(error = %e, "Create failed");
                Err(e)
            }
        }
    }

    #[instrument(skip_all, fields(resource = H::TYPE_SUFFIX))]
    async fn read(&self, current: Value) -> Result<Option<Value>> {
        let guard = self.handler.read().await;
        let handler = guard.as_ref().ok_or_else(not_configured)?;

        match handler.read(Self::from_value(current)?).await {
            Ok(state) => Ok(Some(Self::to_value(&state)?)),
            Err(e) if e.is_not_found() => {
                warn!(error = %e, "Resource no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => {
                error!(error = %e, "Read failed");
                Err(e)
            }
        }
    }

    #[instrument(skip_all, fields(resource = H::TYPE_SUFFIX))]
    async fn update(&self, prior: Value, planned: Value) -> Result<Value> {
        let guard = self.handler.read().await;
        let handler = guard.as_ref().ok_or_else(not_configured)?;

        let prior = Self::from_value(prior)?;
        match handler.update(prior, Self::from_value(planned)?).await {
            Ok(state) => {
                info!("Resource updated");
                Self::to_value(&state)
            }
            Err(e) => {
                error!(error = %e, "Update failed");
                Err(e)
            }
        }
    }

    #[instrument(skip_all, fields(resource = H::TYPE_SUFFIX))]
    async fn delete(&self, current: Value) -> Result<()> {
        let guard = self.handler.read().await;
        let handler = guard.as_ref().ok_or_else(not_configured)?;

        match handler.delete(Self::from_value(current)?).await {
            Ok(()) => {
                info!("Resource deleted");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Delete failed");
                Err(e)
            }
        }
    }

    fn import(&self, id: &str) -> ImportedResource {
        ImportedResource::new(Self::full_type_name(), H::schema().id_only_state(id))
    }
}
