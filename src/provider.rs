//! The Metabase provider root.
//!
//! [`MetabaseProvider`] owns the registry of resources, turns the host's
//! configuration into one shared [`MetabaseClient`], and routes every resource
//! call to the resource registered under that type name.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::client::MetabaseClient;
use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use crate::resources::{
    CollectionResource, DynamicResource, MembershipResource, PermissionGroupResource, Resource,
    UserResource, TYPE_PREFIX,
};
use crate::schema::{has_errors, Diagnostic, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult, ProviderMetadata};
use crate::validation::validate;

/// Provider for Metabase collections, permission groups, users and memberships.
pub struct MetabaseProvider {
    resources: BTreeMap<String, Box<dyn DynamicResource>>,
}

impl Default for MetabaseProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetabaseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetabaseProvider")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MetabaseProvider {
    /// Create an unconfigured provider with every resource registered.
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
        }
        .with_resource(Resource::<CollectionResource>::new())
        .with_resource(Resource::<PermissionGroupResource>::new())
        .with_resource(Resource::<UserResource>::new())
        .with_resource(Resource::<MembershipResource>::new())
    }

    /// Create a provider that is already configured.
    pub async fn configured(config: ProviderConfig) -> Result<Self> {
        let provider = Self::new();
        provider.apply_config(&config).await?;
        Ok(provider)
    }

    fn with_resource(mut self, resource: impl DynamicResource + 'static) -> Self {
        self.resources
            .insert(resource.type_name(), Box::new(resource));
        self
    }

    /// Registered resource type names, sorted.
    pub fn resource_types(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }

    async fn apply_config(&self, config: &ProviderConfig) -> Result<()> {
        let client = Arc::new(MetabaseClient::new(config)?);
        for resource in self.resources.values() {
            resource.configure(Arc::clone(&client)).await;
        }
        info!(host = %config.host, "Provider configured");
        Ok(())
    }

    fn resource(&self, resource_type: &str) -> Result<&dyn DynamicResource> {
        self.resources
            .get(resource_type)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }
}

#[async_trait::async_trait]
impl ProviderService for MetabaseProvider {
    fn schema(&self) -> ProviderSchema {
        self.resources.iter().fold(
            ProviderSchema::new().with_provider_config(ProviderConfig::schema()),
            |schema, (name, resource)| schema.with_resource(name.clone(), resource.schema()),
        )
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: TYPE_PREFIX.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resources: self.resource_types(),
            data_sources: Vec::new(),
        }
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>> {
        Ok(validate(&ProviderConfig::schema(), &config))
    }

    #[instrument(skip_all)]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>> {
        let diagnostics = validate(&ProviderConfig::schema(), &config);
        if has_errors(&diagnostics) {
            warn!(
                diagnostics = diagnostics.len(),
                "Provider configuration is invalid"
            );
            return Ok(diagnostics);
        }

        let config = match ProviderConfig::from_value(config) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Provider configuration is invalid");
                return Ok(vec![e.to_diagnostic("Invalid provider configuration")]);
            }
        };
        self.apply_config(&config).await?;
        Ok(diagnostics)
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>> {
        Ok(self.resource(resource_type)?.validate(&config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult> {
        let plan = self
            .resource(resource_type)?
            .plan(prior_state.as_ref(), &proposed_state);
        debug!(
            resource_type,
            changes = plan.changes.len(),
            requires_replace = plan.requires_replace,
            "Planned resource change"
        );
        Ok(plan)
    }

    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value> {
        self.resource(resource_type)?.create(planned_state).await
    }

    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Option<Value>> {
        self.resource(resource_type)?.read(current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value> {
        self.resource(resource_type)?
            .update(prior_state, planned_state)
            .await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<()> {
        self.resource(resource_type)?.delete(current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>> {
        let imported = self.resource(resource_type)?.import(id);
        debug!(resource_type, id, "Imported resource");
        Ok(vec![imported])
    }
}
