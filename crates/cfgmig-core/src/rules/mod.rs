//! Migration rules
//!
//! Each [`Rule`] pairs a predicate with a transform. The [`RULES`] table is
//! evaluated in priority order for every key of every mapping; the first rule
//! whose predicate holds claims the key and no later rule sees it in that
//! pass. Keys no rule claims are descended into by the migrator.
//!
//! Rules read the *original* value of the key and write into the mapping
//! being built, which may already contain output of earlier rules.

use cfgmig_schema::OptionType;
use serde_json::{Map, Value};

use crate::context::ParentKey;
use crate::error::MigrationError;
use crate::migrator::Migrator;

mod coercion;
mod package_rules;
mod renames;
mod values;

pub use coercion::REMOVED_OPTIONS;
pub use package_rules::DEP_TYPES;

/// Everything a rule may inspect about one key
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Key being migrated
    pub key: &'a str,

    /// Original value of the key
    pub value: &'a Value,

    /// Key the enclosing mapping was reached through
    pub parent: ParentKey<'a>,

    /// Declared kind of `key`, if the registry knows it
    pub option_type: Option<OptionType>,

    /// Nesting depth of the enclosing mapping (root is 0)
    pub depth: usize,
}

impl<'a> RuleInput<'a> {
    /// Input for a key at the root with no declared type
    #[must_use]
    pub fn new(key: &'a str, value: &'a Value) -> Self {
        Self {
            key,
            value,
            parent: ParentKey::Root,
            option_type: None,
            depth: 0,
        }
    }

    /// Set parent context
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: ParentKey<'a>) -> Self {
        self.parent = parent;
        self
    }

    /// Set declared option type
    #[inline]
    #[must_use]
    pub fn with_option_type(mut self, option_type: Option<OptionType>) -> Self {
        self.option_type = option_type;
        self
    }

    /// Set nesting depth
    #[inline]
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Parent context for mappings nested under this key
    #[inline]
    #[must_use]
    pub fn child_parent(&self) -> ParentKey<'a> {
        ParentKey::Key(self.key)
    }
}

/// What applying a rule did to the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Legacy syntax was rewritten
    Migrated,

    /// A tolerated shape was normalized; not reported as a migration
    Coerced,

    /// The rule claimed the key but nothing needed rewriting
    Untouched,
}

impl Outcome {
    /// Check if the outcome counts as a migration
    #[inline]
    #[must_use]
    pub fn is_migrated(self) -> bool {
        matches!(self, Outcome::Migrated)
    }
}

type Applies = fn(&RuleInput<'_>) -> bool;
type Apply = fn(&Migrator, &RuleInput<'_>, &mut Map<String, Value>) -> Result<Outcome, MigrationError>;

/// A named predicate + transform pair
pub struct Rule {
    name: &'static str,
    applies: Applies,
    apply: Apply,
}

impl Rule {
    const fn new(name: &'static str, applies: Applies, apply: Apply) -> Self {
        Self {
            name,
            applies,
            apply,
        }
    }

    /// Rule name (for tracing and diagnostics)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check if this rule claims the key
    #[inline]
    #[must_use]
    pub fn applies(&self, input: &RuleInput<'_>) -> bool {
        (self.applies)(input)
    }

    /// Apply the transform to the mapping being built
    ///
    /// # Errors
    /// Returns error if the value's shape violates the rule's assumptions
    #[inline]
    pub fn apply(
        &self,
        migrator: &Migrator,
        input: &RuleInput<'_>,
        migrated: &mut Map<String, Value>,
    ) -> Result<Outcome, MigrationError> {
        (self.apply)(migrator, input, migrated)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// All rules, in priority order
pub static RULES: &[Rule] = &[
    Rule::new("removed-option", coercion::is_removed_option, coercion::remove_key),
    Rule::new("path-rules", package_rules::is_path_rules, package_rules::fold_path_rules),
    Rule::new("gomod-tidy", values::is_gomod_tidy, values::fold_gomod_tidy),
    Rule::new("host-rule-fields", renames::is_host_rule_field, renames::rename_host_rule_field),
    Rule::new("package-files", package_rules::is_package_files, package_rules::split_package_files),
    Rule::new("dependency-type", package_rules::is_dep_type_key, package_rules::fold_dep_type),
    Rule::new("pin-versions", values::is_pin_versions, values::pin_versions_to_range_strategy),
    Rule::new("git-fs", values::is_git_fs, coercion::remove_key),
    Rule::new("expose-env", values::is_expose_env, values::expose_env_to_trust_level),
    Rule::new("upgrade-in-range", values::is_upgrade_in_range, values::upgrade_in_range_to_range_strategy),
    Rule::new("version-strategy", values::is_version_strategy, values::version_strategy_to_range_strategy),
    Rule::new("semantic-prefix", values::is_semantic_prefix, values::split_semantic_prefix),
    Rule::new("legacy-presets", values::is_extends_list, values::rename_legacy_presets),
    Rule::new("automerge-type", values::is_branch_automerge_type, values::collapse_automerge_type),
    Rule::new("bump-automerge", values::is_bump_automerge, values::fold_bump_automerge),
    Rule::new("renamed-option", renames::is_renamed_option, renames::rename_option),
    Rule::new("ignore-node-modules", values::is_ignore_node_modules, values::ignore_node_modules_to_paths),
    Rule::new("automerge-level", values::is_automerge_level, values::expand_automerge_level),
    Rule::new("packages", package_rules::is_packages, package_rules::fold_packages),
    Rule::new("single-value-list", renames::is_single_value_option, renames::wrap_single_value),
    Rule::new("schedule", values::is_schedule, values::rewrite_schedule),
    Rule::new("semantic-prefix-template", values::has_semantic_prefix_template, values::expand_semantic_prefix_template),
    Rule::new("dep-types", package_rules::is_dep_types_list, package_rules::fold_dep_types),
    Rule::new("node-to-travis", renames::is_enabled_node, renames::move_node_to_travis),
    Rule::new("object-from-boolean", coercion::is_boolean_for_object, coercion::wrap_enabled),
    Rule::new("boolean-from-string", coercion::is_stringly_boolean, coercion::coerce_boolean),
    Rule::new("string-from-list", coercion::is_wrapped_string, coercion::unwrap_string),
    Rule::new("commit-message-variables", values::has_legacy_commit_variables, values::rename_commit_variables),
    Rule::new("raise-deprecation-warnings", values::is_raise_deprecation_warnings, values::fold_raise_deprecation_warnings),
];

/// First rule claiming the key, if any
#[must_use]
pub fn find(input: &RuleInput<'_>) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.applies(input))
}

/// Truthiness legacy configs rely on: null, `false`, zero and `""` are falsy
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Loose equality with `true`: `true`, `1` and numeric strings equal to one
pub(crate) fn loosely_true(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s.trim().parse::<f64>().ok() == Some(1.0),
        _ => false,
    }
}

/// Mapping stored under `key`, created when absent or falsy
///
/// A bare `true` is read as `{"enabled": true}`, the shape object options
/// take when written as a boolean.
pub(crate) fn object_entry<'m>(
    migrated: &'m mut Map<String, Value>,
    key: &str,
) -> Result<&'m mut Map<String, Value>, MigrationError> {
    let entry = migrated
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !is_truthy(entry) {
        *entry = Value::Object(Map::new());
    } else if *entry == Value::Bool(true) {
        let mut enabled = Map::new();
        enabled.insert("enabled".to_string(), Value::Bool(true));
        *entry = Value::Object(enabled);
    }
    match entry {
        Value::Object(map) => Ok(map),
        other => Err(MigrationError::unexpected_shape(key, "object", other)),
    }
}

/// List stored under `key`, created when absent or falsy
pub(crate) fn array_entry<'m>(
    migrated: &'m mut Map<String, Value>,
    key: &str,
) -> Result<&'m mut Vec<Value>, MigrationError> {
    let entry = migrated
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !is_truthy(entry) {
        *entry = Value::Array(Vec::new());
    }
    match entry {
        Value::Array(items) => Ok(items),
        other => Err(MigrationError::unexpected_shape(key, "array", other)),
    }
}

/// Append `item` to the list under `key` unless already present
pub(crate) fn push_unique(
    migrated: &mut Map<String, Value>,
    key: &str,
    item: &str,
) -> Result<(), MigrationError> {
    let items = array_entry(migrated, key)?;
    if !items.iter().any(|existing| existing.as_str() == Some(item)) {
        items.push(Value::String(item.to_string()));
    }
    Ok(())
}

/// Borrow a value as a mapping, or fail naming the key
pub(crate) fn expect_object<'v>(
    key: &str,
    value: &'v Value,
) -> Result<&'v Map<String, Value>, MigrationError> {
    value
        .as_object()
        .ok_or_else(|| MigrationError::unexpected_shape(key, "object", value))
}

/// Borrow a value as a list, or fail naming the key
pub(crate) fn expect_array<'v>(key: &str, value: &'v Value) -> Result<&'v Vec<Value>, MigrationError> {
    value
        .as_array()
        .ok_or_else(|| MigrationError::unexpected_shape(key, "array", value))
}
