//! Schema types for describing the provider and its resources.
//!
//! A schema is the contract the host uses to drive diffing: for every attribute
//! it declares a type, whether the attribute is required, optional or computed,
//! an optional default, and the plan-modifiers that control how the attribute
//! behaves across plan and apply.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// A string value. Entity ids are exposed as strings.
    String,
    /// A boolean value.
    Bool,
}

/// Where an attribute's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttributeFlags {
    /// Must be set in configuration.
    pub required: bool,
    /// May be set in configuration.
    pub optional: bool,
    /// Filled in by the provider.
    pub computed: bool,
    /// Never shown in plan output or logs.
    pub sensitive: bool,
}

impl AttributeFlags {
    /// Flags of a required attribute.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    /// Flags of an optional attribute.
    pub fn optional() -> Self {
        Self {
            optional: true,
            ..Default::default()
        }
    }

    /// Flags of a read-only attribute the provider fills in.
    pub fn computed() -> Self {
        Self {
            computed: true,
            ..Default::default()
        }
    }

    /// Flags of an attribute that falls back to a provider value when unset.
    pub fn optional_computed() -> Self {
        Self {
            optional: true,
            computed: true,
            ..Default::default()
        }
    }

    /// Whether the attribute can only be set by the provider.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// Directive controlling how an attribute behaves across plan and apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
    /// Keep the prior state value instead of marking the attribute unknown.
    UseStateForUnknown,
    /// A change to this attribute destroys and recreates the resource.
    RequiresReplace,
}

/// One attribute of a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Value type.
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Required/optional/computed flags.
    #[serde(flatten)]
    pub flags: AttributeFlags,
    /// Description shown to users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Plan-modifiers applied to this attribute.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
    /// Value used when the configuration leaves the attribute unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Attribute {
    /// Attribute with no description, modifiers or default.
    pub fn new(attr_type: AttributeType, flags: AttributeFlags) -> Self {
        Self {
            attr_type,
            flags,
            description: None,
            plan_modifiers: Vec::new(),
            default: None,
        }
    }

    /// Required string.
    pub fn required_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::required())
    }

    /// Optional string.
    pub fn optional_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::optional())
    }

    /// Read-only string set by the provider.
    pub fn computed_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::computed())
    }

    /// Bool that may be configured and otherwise takes its default.
    pub fn optional_computed_bool() -> Self {
        Self::new(AttributeType::Bool, AttributeFlags::optional_computed())
    }

    /// Computed string id that keeps its prior value across plans.
    pub fn id() -> Self {
        Self::computed_string().with_plan_modifier(PlanModifier::UseStateForUnknown)
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a plan-modifier.
    pub fn with_plan_modifier(mut self, modifier: PlanModifier) -> Self {
        if !self.plan_modifiers.contains(&modifier) {
            self.plan_modifiers.push(modifier);
        }
        self
    }

    /// Shorthand for [`PlanModifier::RequiresReplace`].
    pub fn requires_replace(self) -> Self {
        self.with_plan_modifier(PlanModifier::RequiresReplace)
    }

    /// Value planned when configuration leaves the attribute unset.
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Hide the value from plan output and logs.
    pub fn sensitive(mut self) -> Self {
        self.flags.sensitive = true;
        self
    }

    /// Whether the attribute carries the given plan-modifier.
    pub fn has_plan_modifier(&self, modifier: PlanModifier) -> bool {
        self.plan_modifiers.contains(&modifier)
    }
}

/// Attributes of one resource, or of the provider configuration block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema version recorded alongside stored state.
    #[serde(default)]
    pub version: u64,
    /// Description shown to users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes keyed by name.
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    /// Empty schema at `version`.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            description: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Empty schema at version 0.
    pub fn v0() -> Self {
        Self::new(0)
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add or replace an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// A state object with every attribute set to `null` except `id`.
    pub fn id_only_state(&self, id: &str) -> serde_json::Value {
        let mut state = serde_json::Map::new();
        for name in self.attributes.keys() {
            state.insert(name.clone(), serde_json::Value::Null);
        }
        state.insert("id".to_string(), serde_json::Value::String(id.to_string()));
        serde_json::Value::Object(state)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::v0()
    }
}

/// Full schema for the provider: its configuration and every resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderSchema {
    /// Provider configuration block.
    #[serde(default)]
    pub provider: Schema,
    /// Resource schemas keyed by type name.
    #[serde(default)]
    pub resources: BTreeMap<String, Schema>,
    /// Data source schemas keyed by type name. Always empty here.
    #[serde(default)]
    pub data_sources: BTreeMap<String, Schema>,
}

impl ProviderSchema {
    /// Empty provider schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration block.
    pub fn with_provider_config(mut self, schema: Schema) -> Self {
        self.provider = schema;
        self
    }

    /// Register a resource schema under `name`.
    pub fn with_resource(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.resources.insert(name.into(), schema);
        self
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// The operation cannot proceed.
    Error,
    /// The operation proceeds; the user should look at it.
    Warning,
}

/// A diagnostic message surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: DiagnosticSeverity,
    /// One-line summary.
    pub summary: String,
    /// Longer explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Attribute the diagnostic points at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    /// Error with `summary`.
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Warning with `summary`.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Add a detailed description.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the attribute path the diagnostic refers to.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Whether any diagnostic in the list is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_builders() {
        let attr = Attribute::required_string()
            .with_description("Email of the user")
            .requires_replace();
        assert!(attr.flags.required);
        assert!(attr.has_plan_modifier(PlanModifier::RequiresReplace));
        assert!(!attr.has_plan_modifier(PlanModifier::UseStateForUnknown));

        let id = Attribute::id();
        assert!(id.flags.is_computed_only());
        assert!(id.has_plan_modifier(PlanModifier::UseStateForUnknown));

        let active = Attribute::optional_computed_bool().with_default(json!(true));
        assert!(!active.flags.is_computed_only());
        assert_eq!(active.default, Some(json!(true)));
    }

    #[test]
    fn test_plan_modifier_is_not_duplicated() {
        let attr = Attribute::required_string()
            .requires_replace()
            .requires_replace();
        assert_eq!(attr.plan_modifiers.len(), 1);
    }

    #[test]
    fn test_attribute_serialization() {
        let attr = Attribute::required_string().sensitive();
        let value = serde_json::to_value(&attr).unwrap();
        assert_eq!(value["type"], "string");
        assert_eq!(value["required"], true);
        assert_eq!(value["sensitive"], true);
        assert!(value.get("plan_modifiers").is_none());

        let attr = Attribute::id();
        let value = serde_json::to_value(&attr).unwrap();
        assert_eq!(value["plan_modifiers"], json!(["use_state_for_unknown"]));
    }

    #[test]
    fn test_id_only_state() {
        let schema = Schema::v0()
            .with_attribute("id", Attribute::id())
            .with_attribute("name", Attribute::required_string());

        let state = schema.id_only_state("42");
        assert_eq!(state, json!({"id": "42", "name": null}));
    }

    #[test]
    fn test_provider_schema() {
        let provider_schema = ProviderSchema::new()
            .with_provider_config(
                Schema::v0().with_attribute("api_key", Attribute::required_string().sensitive()),
            )
            .with_resource(
                "metabase_permission_group",
                Schema::v0()
                    .with_attribute("name", Attribute::required_string())
                    .with_attribute("id", Attribute::id()),
            );

        assert!(provider_schema.provider.attributes.contains_key("api_key"));
        assert!(provider_schema
            .resources
            .contains_key("metabase_permission_group"));
        assert!(provider_schema.data_sources.is_empty());
    }

    #[test]
    fn test_diagnostic() {
        let err = Diagnostic::error("Invalid value")
            .with_detail("is_active must be true when creating a user")
            .with_attribute("is_active");

        assert_eq!(err.severity, DiagnosticSeverity::Error);
        assert_eq!(err.attribute.as_deref(), Some("is_active"));
        assert!(has_errors(&[Diagnostic::warning("w"), err]));
        assert!(!has_errors(&[Diagnostic::warning("w")]));
    }
}
