//! Rules that rewrite legacy values in place or into sibling options

use serde_json::{Map, Value};

use super::{is_truthy, loosely_true, object_entry, push_unique, Outcome, RuleInput};
use crate::error::MigrationError;
use crate::migrator::Migrator;
use crate::schedule::migrate_schedule;

const SEMANTIC_PREFIX_VARIABLE: &str = "{{semanticPrefix}}";

const SEMANTIC_PREFIX_TEMPLATE: &str = "{{#if semanticCommitType}}{{semanticCommitType}}{{#if semanticCommitScope}}({{semanticCommitScope}}){{/if}}: {{/if}}";

/// Commit-message template variables, renamed in sequence
const COMMIT_VARIABLES: &[(&str, &str)] = &[
    ("currentVersion", "currentValue"),
    ("newVersion", "newValue"),
    ("newValueMajor", "newMajor"),
    ("newValueMinor", "newMinor"),
];

fn set(migrated: &mut Map<String, Value>, key: &str, value: impl Into<Value>) {
    migrated.insert(key.to_string(), value.into());
}

pub(super) fn is_gomod_tidy(input: &RuleInput<'_>) -> bool {
    input.key == "gomodTidy"
}

pub(super) fn fold_gomod_tidy(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    if is_truthy(input.value) {
        push_unique(migrated, "postUpdateOptions", "gomodTidy")?;
    }
    migrated.shift_remove(input.key);
    Ok(Outcome::Migrated)
}

pub(super) fn is_pin_versions(input: &RuleInput<'_>) -> bool {
    input.key == "pinVersions"
}

pub(super) fn pin_versions_to_range_strategy(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    migrated.shift_remove(input.key);
    match input.value {
        Value::Bool(true) => set(migrated, "rangeStrategy", "pin"),
        Value::Bool(false) => set(migrated, "rangeStrategy", "replace"),
        _ => {}
    }
    Ok(Outcome::Migrated)
}

pub(super) fn is_git_fs(input: &RuleInput<'_>) -> bool {
    input.key == "gitFs"
}

pub(super) fn is_expose_env(input: &RuleInput<'_>) -> bool {
    input.key == "exposeEnv"
}

pub(super) fn expose_env_to_trust_level(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    migrated.shift_remove(input.key);
    match input.value {
        Value::Bool(true) => set(migrated, "trustLevel", "high"),
        Value::Bool(false) => set(migrated, "trustLevel", "low"),
        _ => {}
    }
    Ok(Outcome::Migrated)
}

pub(super) fn is_upgrade_in_range(input: &RuleInput<'_>) -> bool {
    input.key == "upgradeInRange"
}

pub(super) fn upgrade_in_range_to_range_strategy(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    migrated.shift_remove(input.key);
    if *input.value == Value::Bool(true) {
        set(migrated, "rangeStrategy", "bump");
    }
    Ok(Outcome::Migrated)
}

pub(super) fn is_version_strategy(input: &RuleInput<'_>) -> bool {
    input.key == "versionStrategy"
}

pub(super) fn version_strategy_to_range_strategy(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    migrated.shift_remove(input.key);
    if input.value.as_str() == Some("widen") {
        set(migrated, "rangeStrategy", "widen");
    }
    Ok(Outcome::Migrated)
}

pub(super) fn is_semantic_prefix(input: &RuleInput<'_>) -> bool {
    input.key == "semanticPrefix"
}

/// `"chore(deps): "` becomes type `chore` and scope `deps`
pub(super) fn split_semantic_prefix(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let prefix = input
        .value
        .as_str()
        .ok_or_else(|| MigrationError::unexpected_shape(input.key, "string", input.value))?;
    migrated.shift_remove(input.key);

    let head = prefix.split(':').next().unwrap_or_default();
    let mut parts = head.split('(');
    let commit_type = parts.next().unwrap_or_default();
    let scope = parts
        .next()
        .and_then(|rest| rest.split(')').next())
        .map_or(Value::Null, Value::from);

    set(migrated, "semanticCommitType", commit_type);
    set(migrated, "semanticCommitScope", scope);
    Ok(Outcome::Migrated)
}

pub(super) fn is_extends_list(input: &RuleInput<'_>) -> bool {
    input.key == "extends" && input.value.is_array()
}

pub(super) fn rename_legacy_presets(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let presets = input.value.as_array().map(Vec::as_slice).unwrap_or_default();
    let mut changed = false;
    let renamed: Vec<Value> = presets
        .iter()
        .map(|preset| {
            let current = match preset.as_str() {
                Some("config:application" | ":js-app") => "config:js-app",
                Some(":library" | "config:library") => "config:js-lib",
                _ => return preset.clone(),
            };
            changed = true;
            Value::from(current)
        })
        .collect();

    if !changed {
        return Ok(Outcome::Untouched);
    }
    set(migrated, input.key, renamed);
    Ok(Outcome::Migrated)
}

pub(super) fn is_branch_automerge_type(input: &RuleInput<'_>) -> bool {
    input.key == "automergeType"
        && input
            .value
            .as_str()
            .is_some_and(|kind| kind.starts_with("branch-"))
}

pub(super) fn collapse_automerge_type(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    set(migrated, input.key, "branch");
    Ok(Outcome::Migrated)
}

fn bump_target(key: &str) -> Option<&'static str> {
    match key {
        "automergeMinor" => Some("minor"),
        "automergeMajor" => Some("major"),
        "automergePatch" => Some("patch"),
        _ => None,
    }
}

pub(super) fn is_bump_automerge(input: &RuleInput<'_>) -> bool {
    bump_target(input.key).is_some()
}

pub(super) fn fold_bump_automerge(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    if let Some(target) = bump_target(input.key) {
        object_entry(migrated, target)?.insert("automerge".to_string(), Value::Bool(loosely_true(input.value)));
    }
    migrated.shift_remove(input.key);
    Ok(Outcome::Migrated)
}

pub(super) fn is_ignore_node_modules(input: &RuleInput<'_>) -> bool {
    input.key == "ignoreNodeModules"
}

pub(super) fn ignore_node_modules_to_paths(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    migrated.shift_remove(input.key);
    let paths = if is_truthy(input.value) {
        vec![Value::from("node_modules/")]
    } else {
        Vec::new()
    };
    set(migrated, "ignorePaths", paths);
    Ok(Outcome::Migrated)
}

pub(super) fn is_automerge_level(input: &RuleInput<'_>) -> bool {
    input.key == "automerge" && matches!(input.value.as_str(), Some("none" | "patch" | "minor" | "any"))
}

pub(super) fn expand_automerge_level(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let levels: &[(&str, bool)] = match input.value.as_str() {
        Some("none") => {
            set(migrated, input.key, false);
            return Ok(Outcome::Migrated);
        }
        Some("any") => {
            set(migrated, input.key, true);
            return Ok(Outcome::Migrated);
        }
        Some("patch") => &[("patch", true), ("minor", false), ("major", false)],
        Some("minor") => &[("minor", true), ("major", false)],
        _ => return Ok(Outcome::Untouched),
    };

    migrated.shift_remove(input.key);
    for (update_type, automerge) in levels {
        object_entry(migrated, update_type)?.insert("automerge".to_string(), Value::Bool(*automerge));
    }
    Ok(Outcome::Migrated)
}

pub(super) fn is_schedule(input: &RuleInput<'_>) -> bool {
    input.key == "schedule" && is_truthy(input.value)
}

pub(super) fn rewrite_schedule(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let schedule = migrate_schedule(input.value)?;
    if !schedule.is_migrated {
        return Ok(Outcome::Untouched);
    }
    set(migrated, input.key, schedule.value);
    Ok(Outcome::Migrated)
}

pub(super) fn has_semantic_prefix_template(input: &RuleInput<'_>) -> bool {
    input
        .value
        .as_str()
        .is_some_and(|template| template.starts_with(SEMANTIC_PREFIX_VARIABLE))
}

pub(super) fn expand_semantic_prefix_template(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let Some(template) = input.value.as_str() else {
        return Ok(Outcome::Untouched);
    };
    let mut expanded = template.replacen(SEMANTIC_PREFIX_VARIABLE, SEMANTIC_PREFIX_TEMPLATE, 1);
    if input.key.starts_with("commitMessage") {
        expanded = rename_variables(&expanded);
    }
    set(migrated, input.key, expanded);
    Ok(Outcome::Migrated)
}

fn rename_variables(template: &str) -> String {
    COMMIT_VARIABLES
        .iter()
        .fold(template.to_string(), |text, (old, new)| text.replace(old, new))
}

pub(super) fn has_legacy_commit_variables(input: &RuleInput<'_>) -> bool {
    input.key.starts_with("commitMessage")
        && input
            .value
            .as_str()
            .is_some_and(|text| text.contains("currentVersion") || text.contains("newVersion"))
}

pub(super) fn rename_commit_variables(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let Some(template) = input.value.as_str() else {
        return Ok(Outcome::Untouched);
    };
    set(migrated, input.key, rename_variables(template));
    Ok(Outcome::Migrated)
}

pub(super) fn is_raise_deprecation_warnings(input: &RuleInput<'_>) -> bool {
    input.key == "raiseDeprecationWarnings" && !input.value.is_array() && !input.value.is_object()
}

pub(super) fn fold_raise_deprecation_warnings(
    _: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    migrated.shift_remove(input.key);
    if *input.value == Value::Bool(false) {
        push_unique(migrated, "suppressNotifications", "deprecationWarningIssues")?;
    }
    Ok(Outcome::Migrated)
}
