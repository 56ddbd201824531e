//! Removed options and declared-type coercions

use cfgmig_schema::OptionType;
use serde_json::{Map, Value};

use super::{find, Outcome, RuleInput};
use crate::error::MigrationError;
use crate::migrator::Migrator;

/// Options with no current equivalent; dropped wherever they appear
pub const REMOVED_OPTIONS: &[&str] = &[
    "maintainYarnLock",
    "yarnCacheFolder",
    "yarnMaintenanceBranchName",
    "yarnMaintenanceCommitMessage",
    "yarnMaintenancePrTitle",
    "yarnMaintenancePrBody",
    "groupBranchName",
    "groupCommitMessage",
    "groupPrTitle",
    "groupPrBody",
];

pub(super) fn is_removed_option(input: &RuleInput<'_>) -> bool {
    REMOVED_OPTIONS.contains(&input.key)
}

pub(super) fn remove_key(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    migrated.shift_remove(input.key);
    Ok(Outcome::Migrated)
}

pub(super) fn is_boolean_for_object(input: &RuleInput<'_>) -> bool {
    input.option_type == Some(OptionType::Object) && input.value.is_boolean()
}

pub(super) fn wrap_enabled(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let enabled = input.value.as_bool().unwrap_or_default();
    migrated.insert(input.key.to_string(), enabled_object(enabled));
    Ok(Outcome::Migrated)
}

pub(super) fn is_stringly_boolean(input: &RuleInput<'_>) -> bool {
    input.option_type == Some(OptionType::Boolean)
        && matches!(input.value.as_str(), Some("true" | "false"))
}

pub(super) fn coerce_boolean(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let flag = input.value.as_str() == Some("true");
    migrated.insert(input.key.to_string(), Value::Bool(flag));
    Ok(Outcome::Coerced)
}

pub(super) fn is_wrapped_string(input: &RuleInput<'_>) -> bool {
    input.option_type == Some(OptionType::String)
        && input.value.as_array().is_some_and(|items| items.len() == 1)
}

pub(super) fn unwrap_string(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let single = input.value.as_array().and_then(|items| items.first());
    let Some(text) = single.and_then(scalar_to_string) else {
        return Ok(Outcome::Untouched);
    };
    let unwrapped = Value::String(text);
    migrated.insert(input.key.to_string(), unwrapped.clone());

    // The unwrapped string may itself be legacy syntax; rewrite it in this pass.
    let rewrite = RuleInput::new(input.key, &unwrapped)
        .with_parent(input.parent)
        .with_option_type(input.option_type)
        .with_depth(input.depth);
    match find(&rewrite) {
        Some(rule) => {
            let outcome = rule.apply(migrator, &rewrite, migrated)?;
            tracing::debug!(rule = rule.name(), key = input.key, ?outcome, "rule applied to unwrapped value");
            Ok(if outcome.is_migrated() { Outcome::Migrated } else { Outcome::Coerced })
        }
        None => Ok(Outcome::Coerced),
    }
}

/// Normalize a value to the declared kind of the key it now lives under
///
/// Applied to values moved by renames so a second pass finds nothing left
/// to coerce.
pub(crate) fn coerce_for(option_type: Option<OptionType>, value: Value) -> Value {
    match (option_type, value) {
        (Some(OptionType::Object), Value::Bool(enabled)) => enabled_object(enabled),
        (Some(OptionType::Boolean), Value::String(text)) if text == "true" || text == "false" => {
            Value::Bool(text == "true")
        }
        (Some(OptionType::String), Value::Array(items)) if items.len() == 1 => {
            match scalar_to_string(&items[0]) {
                Some(text) => Value::String(text),
                None => Value::Array(items),
            }
        }
        (_, value) => value,
    }
}

fn enabled_object(enabled: bool) -> Value {
    let mut map = Map::new();
    map.insert("enabled".to_string(), Value::Bool(enabled));
    Value::Object(map)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
