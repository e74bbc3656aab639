//! Plain data types exchanged with the host.

use serde::{Deserialize, Serialize};

/// Planned change of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute name.
    pub path: String,
    /// Prior value; `None` when the attribute is being set for the first time.
    pub before: Option<serde_json::Value>,
    /// Planned value; `None` when the attribute is going away.
    pub after: Option<serde_json::Value>,
}

impl AttributeChange {
    /// Change from `before` to `after`.
    pub fn new(
        path: impl Into<String>,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        Self {
            path: path.into(),
            before,
            after,
        }
    }

    /// Attribute gaining a value.
    pub fn added(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, None, Some(value))
    }

    /// Attribute losing its value.
    pub fn removed(path: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(path, Some(value), None)
    }

    /// Attribute whose value changes.
    pub fn modified(
        path: impl Into<String>,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> Self {
        Self::new(path, Some(before), Some(after))
    }
}

/// Outcome of planning one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// State after apply; `null` when destroying, `null` attributes are known after apply.
    pub planned_state: serde_json::Value,
    /// Attributes that change.
    pub changes: Vec<AttributeChange>,
    /// Whether apply destroys and recreates the entity.
    pub requires_replace: bool,
}

impl PlanResult {
    /// Plan that leaves `state` as is.
    pub fn no_change(state: serde_json::Value) -> Self {
        Self {
            planned_state: state,
            changes: Vec::new(),
            requires_replace: false,
        }
    }

    /// Plan with the given changes.
    pub fn with_changes(
        planned_state: serde_json::Value,
        changes: Vec<AttributeChange>,
        requires_replace: bool,
    ) -> Self {
        Self {
            planned_state,
            changes,
            requires_replace,
        }
    }
}

/// State produced by importing an existing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// Resource type name, e.g. `metabase_collection`.
    pub resource_type: String,
    /// Id-only state, completed by the next read.
    pub state: serde_json::Value,
}

impl ImportedResource {
    /// Imported `state` for `resource_type`.
    pub fn new(resource_type: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// Provider metadata: the names of everything the provider serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// Provider type name, used as the prefix of every resource type.
    pub type_name: String,
    /// Provider version.
    pub version: String,
    /// Resource type names.
    pub resources: Vec<String>,
    /// Data source type names.
    pub data_sources: Vec<String>,
}
