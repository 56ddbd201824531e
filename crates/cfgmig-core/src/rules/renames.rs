//! Renamed options

use serde_json::{Map, Value};

use super::coercion::coerce_for;
use super::{object_entry, Outcome, RuleInput};
use crate::error::MigrationError;
use crate::migrator::Migrator;

/// Options renamed without a change of meaning
const RENAMES: &[(&str, &str)] = &[
    ("multipleMajorPrs", "separateMultipleMajor"),
    ("renovateFork", "includeForks"),
    ("separateMajorReleases", "separateMajorMinor"),
    ("separatePatchReleases", "separateMinorPatch"),
    ("excludedPackageNames", "excludePackageNames"),
];

/// Singular options replaced by a list-valued option
const SINGLE_VALUE_OPTIONS: &[(&str, &str)] = &[
    ("packageName", "packageNames"),
    ("packagePattern", "packagePatterns"),
    ("baseBranch", "baseBranches"),
];

/// Fields of a `hostRules` entry and their current names
const HOST_RULE_FIELDS: &[(&str, &str)] = &[
    ("platform", "hostType"),
    ("endpoint", "baseUrl"),
    ("host", "hostName"),
];

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(old, _)| *old == key).map(|(_, new)| *new)
}

/// Move `input.value` from its key to `new_key`
fn move_value(migrator: &Migrator, input: &RuleInput<'_>, new_key: &str, value: Value, migrated: &mut Map<String, Value>) {
    let value = coerce_for(migrator.registry().type_of(new_key), value);
    migrated.shift_remove(input.key);
    migrated.insert(new_key.to_string(), value);
}

pub(super) fn is_host_rule_field(input: &RuleInput<'_>) -> bool {
    input.parent.is("hostRules") && lookup(HOST_RULE_FIELDS, input.key).is_some()
}

pub(super) fn rename_host_rule_field(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    if let Some(new_key) = lookup(HOST_RULE_FIELDS, input.key) {
        move_value(migrator, input, new_key, input.value.clone(), migrated);
    }
    Ok(Outcome::Migrated)
}

pub(super) fn is_renamed_option(input: &RuleInput<'_>) -> bool {
    lookup(RENAMES, input.key).is_some()
}

pub(super) fn rename_option(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    if let Some(new_key) = lookup(RENAMES, input.key) {
        move_value(migrator, input, new_key, input.value.clone(), migrated);
    }
    Ok(Outcome::Migrated)
}

pub(super) fn is_single_value_option(input: &RuleInput<'_>) -> bool {
    lookup(SINGLE_VALUE_OPTIONS, input.key).is_some()
}

pub(super) fn wrap_single_value(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let Some(new_key) = lookup(SINGLE_VALUE_OPTIONS, input.key) else {
        return Ok(Outcome::Untouched);
    };
    // only baseBranch ever accepted a list
    let list = match input.value {
        Value::Array(_) if input.key == "baseBranch" => input.value.clone(),
        other => Value::Array(vec![other.clone()]),
    };
    move_value(migrator, input, new_key, list, migrated);
    Ok(Outcome::Migrated)
}

pub(super) fn is_enabled_node(input: &RuleInput<'_>) -> bool {
    input.key == "node"
        && match input.value {
            Value::Bool(enabled) => *enabled,
            Value::Object(fields) => fields.get("enabled") == Some(&Value::Bool(true)),
            _ => false,
        }
}

pub(super) fn move_node_to_travis(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let mut node = input.value.as_object().cloned().unwrap_or_default();
    node.shift_remove("enabled");

    object_entry(migrated, "travis")?.insert("enabled".to_string(), Value::Bool(true));

    if node.is_empty() {
        migrated.shift_remove(input.key);
    } else {
        let rest = migrator.migrate_at(&node, input.child_parent(), input.depth + 1)?;
        migrated.insert(input.key.to_string(), Value::Object(rest.config));
    }
    Ok(Outcome::Migrated)
}
