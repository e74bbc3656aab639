//! Schema-driven planning.
//!
//! Resources do not plan by hand: the planned state is derived from the
//! configuration, the prior state and the schema's defaults and plan-modifiers.

use serde_json::{Map, Value};

use crate::schema::{PlanModifier, Schema};
use crate::types::{AttributeChange, PlanResult};

/// Compute the planned state and attribute changes for one resource.
///
/// - `prior` is `None` when the resource is being created.
/// - `proposed` is `Value::Null` when the resource is being destroyed.
///
/// A `null` computed attribute in the planned state means "known after apply".
pub fn plan_resource_change(schema: &Schema, prior: Option<&Value>, proposed: &Value) -> PlanResult {
    let prior = prior.and_then(Value::as_object);

    if proposed.is_null() {
        let changes = prior
            .map(|obj| {
                obj.iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| AttributeChange::removed(k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        return PlanResult::with_changes(Value::Null, changes, false);
    }

    let mut planned = Map::new();
    for (name, attr) in &schema.attributes {
        let prior_value = prior.and_then(|p| p.get(name)).filter(|v| !v.is_null());
        let mut value = proposed.get(name).cloned().unwrap_or(Value::Null);

        if attr.flags.is_computed_only() {
            if attr.has_plan_modifier(PlanModifier::UseStateForUnknown) {
                if let Some(prior_value) = prior_value {
                    value = prior_value.clone();
                }
            }
        } else if value.is_null() {
            if let Some(default) = &attr.default {
                value = default.clone();
            }
        }

        planned.insert(name.clone(), value);
    }

    let Some(prior) = prior else {
        let changes = planned
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| AttributeChange::added(k.clone(), v.clone()))
            .collect();
        return PlanResult::with_changes(Value::Object(planned), changes, false);
    };

    let mut changes = Vec::new();
    let mut requires_replace = false;
    for (name, attr) in &schema.attributes {
        let before = prior.get(name).cloned().unwrap_or(Value::Null);
        let after = planned.get(name).cloned().unwrap_or(Value::Null);
        if before == after || (attr.flags.is_computed_only() && after.is_null()) {
            continue;
        }

        if attr.has_plan_modifier(PlanModifier::RequiresReplace) {
            requires_replace = true;
        }
        changes.push(match (before.is_null(), after.is_null()) {
            (true, _) => AttributeChange::added(name.clone(), after),
            (_, true) => AttributeChange::removed(name.clone(), before),
            _ => AttributeChange::modified(name.clone(), before, after),
        });
    }

    if requires_replace {
        // The replacement gets fresh computed values.
        for (name, attr) in &schema.attributes {
            if attr.flags.is_computed_only() {
                planned.insert(name.clone(), Value::Null);
            }
        }
    }

    if changes.is_empty() {
        PlanResult::no_change(Value::Object(planned))
    } else {
        PlanResult::with_changes(Value::Object(planned), changes, requires_replace)
    }
}
