//! Tree migrator
//!
//! Walks a configuration tree depth-first. At every mapping, each key is
//! offered to the [`RULES`](crate::rules::RULES) table; keys no rule claims
//! are descended into with the key as the new parent context.

use std::sync::Arc;

use cfgmig_schema::OptionRegistry;
use serde_json::{Map, Value};

use crate::context::ParentKey;
use crate::error::{MigrationError, MigrationResult};
use crate::rules::{self, array_entry, is_truthy, RuleInput};

/// Key legacy configs used for what is now `hostRules`
const ENDPOINTS: &str = "endpoints";
const HOST_RULES: &str = "hostRules";

/// Outcome of migrating one mapping
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MigratedConfig {
    /// True if any rule rewrote legacy syntax anywhere in the subtree
    pub is_migrated: bool,

    /// Migrated copy; never aliases the input
    pub config: Map<String, Value>,
}

impl MigratedConfig {
    /// Migrated tree as a JSON value
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.config)
    }
}

/// Rule-driven configuration migrator
///
/// Holds the option registry it was built with and nothing else mutable, so
/// one migrator can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Migrator {
    registry: Arc<OptionRegistry>,
    max_depth: Option<usize>,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new(OptionRegistry::with_defaults())
    }
}

impl Migrator {
    /// Create migrator over an option registry
    #[must_use]
    pub fn new(registry: OptionRegistry) -> Self {
        Self::with_registry(Arc::new(registry))
    }

    /// Create migrator sharing an existing registry
    #[must_use]
    pub fn with_registry(registry: Arc<OptionRegistry>) -> Self {
        Self {
            registry,
            max_depth: None,
        }
    }

    /// Fail with [`MigrationError::DepthExceeded`] past `limit` nested mappings
    #[must_use]
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Option registry in use
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// Configured depth limit, if any
    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Migrate a configuration root
    ///
    /// # Errors
    /// Returns [`MigrationError::NotAnObject`] unless `config` is a mapping,
    /// or the first error raised by a rule anywhere in the tree
    ///
    /// # Examples
    /// ```
    /// use cfgmig_core::Migrator;
    /// use serde_json::json;
    ///
    /// let result = Migrator::default().migrate(&json!({"pinVersions": true})).unwrap();
    /// assert!(result.is_migrated);
    /// assert_eq!(result.into_value(), json!({"rangeStrategy": "pin"}));
    /// ```
    pub fn migrate(&self, config: &Value) -> MigrationResult<MigratedConfig> {
        match config {
            Value::Object(root) => self.migrate_at(root, ParentKey::Root, 0),
            other => {
                let err = MigrationError::not_an_object(other);
                tracing::debug!(config = ?other, error = %err, "migrate_config() error");
                Err(err)
            }
        }
    }

    /// Migrate a mapping found under `parent`
    ///
    /// # Errors
    /// Returns the first error raised by a rule anywhere in the subtree
    pub fn migrate_with_parent(
        &self,
        config: &Map<String, Value>,
        parent: ParentKey<'_>,
    ) -> MigrationResult<MigratedConfig> {
        self.migrate_at(config, parent, 0)
    }

    /// Migrate a mapping at a known nesting depth
    ///
    /// Every failing level reports its own input before propagating, so the
    /// log shows the path from the offending value back to the root.
    pub(crate) fn migrate_at(
        &self,
        config: &Map<String, Value>,
        parent: ParentKey<'_>,
        depth: usize,
    ) -> MigrationResult<MigratedConfig> {
        self.migrate_level(config, parent, depth).map_err(|err| {
            tracing::debug!(config = ?config, error = %err, "migrate_config() error");
            err
        })
    }

    fn migrate_level(
        &self,
        config: &Map<String, Value>,
        parent: ParentKey<'_>,
        depth: usize,
    ) -> MigrationResult<MigratedConfig> {
        if let Some(limit) = self.max_depth {
            if depth > limit {
                return Err(MigrationError::DepthExceeded { limit });
            }
        }

        let mut migrated = config.clone();
        let mut is_migrated = false;

        for (key, value) in config {
            let input = RuleInput::new(key, value)
                .with_parent(parent)
                .with_option_type(self.registry.type_of(key))
                .with_depth(depth);

            if let Some(rule) = rules::find(&input) {
                let outcome = rule.apply(self, &input, &mut migrated)?;
                tracing::debug!(rule = rule.name(), key = %key, parent = %parent, ?outcome, "rule applied");
                is_migrated |= outcome.is_migrated();
            } else {
                is_migrated |= self.descend(key, &mut migrated, depth)?;
            }
        }

        is_migrated |= self.fold_endpoints(&mut migrated, depth)?;

        Ok(MigratedConfig {
            is_migrated,
            config: migrated,
        })
    }

    /// Migrate nested mappings under `key`, in place
    fn descend(&self, key: &str, migrated: &mut Map<String, Value>, depth: usize) -> MigrationResult<bool> {
        let parent = ParentKey::Key(key);
        match migrated.get_mut(key) {
            Some(Value::Array(items)) => {
                let mut changed = false;
                for item in items.iter_mut() {
                    if let Value::Object(child) = item {
                        let result = self.migrate_at(child, parent, depth + 1)?;
                        changed |= result.is_migrated;
                        *child = result.config;
                    }
                }
                Ok(changed)
            }
            Some(Value::Object(child)) => {
                let result = self.migrate_at(child, parent, depth + 1)?;
                *child = result.config;
                Ok(result.is_migrated)
            }
            _ => Ok(false),
        }
    }

    /// Rename a legacy `endpoints` list to `hostRules`
    fn fold_endpoints(&self, migrated: &mut Map<String, Value>, depth: usize) -> MigrationResult<bool> {
        let Some(endpoints) = migrated.shift_remove(ENDPOINTS) else {
            return Ok(false);
        };
        if !is_truthy(&endpoints) {
            return Ok(true);
        }

        let host_rules = match endpoints {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(rule) => self
                            .migrate_at(&rule, ParentKey::Key(HOST_RULES), depth + 1)
                            .map(MigratedConfig::into_value),
                        other => Ok(other),
                    })
                    .collect::<MigrationResult<Vec<_>>>()?,
            ),
            Value::Object(rule) => self
                .migrate_at(&rule, ParentKey::Key(HOST_RULES), depth + 1)?
                .into_value(),
            other => other,
        };

        match host_rules {
            Value::Array(items) if matches!(migrated.get(HOST_RULES), Some(Value::Array(_))) => {
                array_entry(migrated, HOST_RULES)?.extend(items);
            }
            other => {
                migrated.insert(HOST_RULES.to_string(), other);
            }
        }
        tracing::debug!(depth, "renamed endpoints to hostRules");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgmig_schema::OptionType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn migrate(config: Value) -> (bool, Value) {
        let result = Migrator::default().migrate(&config).unwrap();
        (result.is_migrated, result.into_value())
    }

    #[test]
    fn empty_config_is_unchanged() {
        assert_eq!(migrate(json!({})), (false, json!({})));
    }

    #[test]
    fn current_config_is_unchanged() {
        let config = json!({
            "extends": ["config:base"],
            "rangeStrategy": "pin",
            "packageRules": [{"packageNames": ["lodash"], "automerge": true}],
            "major": {"automerge": false}
        });
        assert_eq!(migrate(config.clone()), (false, config));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = Migrator::default().migrate(&json!(["a"])).unwrap_err();
        assert_eq!(err, MigrationError::NotAnObject { found: "array" });
    }

    #[test]
    fn nested_objects_are_migrated() {
        let (is_migrated, config) = migrate(json!({"lockFileMaintenance": {"schedule": "after 10pm and before 5am"}}));
        assert!(is_migrated);
        assert_eq!(config, json!({"lockFileMaintenance": {"schedule": ["after 10pm", "before 5am"]}}));
    }

    #[test]
    fn array_elements_are_migrated_with_parent_context() {
        let (is_migrated, config) = migrate(json!({
            "hostRules": [{"platform": "npm", "endpoint": "https://registry.example.com/"}, "unchanged"],
            "platform": "github"
        }));
        assert!(is_migrated);
        assert_eq!(
            config,
            json!({
                "hostRules": [{"hostType": "npm", "baseUrl": "https://registry.example.com/"}, "unchanged"],
                "platform": "github"
            })
        );
    }

    #[test]
    fn coercions_persist_without_flag() {
        let (is_migrated, config) = migrate(json!({"major": {"rebaseStalePrs": "true"}}));
        assert!(!is_migrated);
        assert_eq!(config, json!({"major": {"rebaseStalePrs": true}}));
    }

    #[test]
    fn endpoints_become_host_rules() {
        let (is_migrated, config) = migrate(json!({
            "hostRules": [{"hostType": "docker"}],
            "endpoints": [{"platform": "gitlab", "token": "abc"}]
        }));
        assert!(is_migrated);
        assert_eq!(
            config,
            json!({"hostRules": [{"hostType": "docker"}, {"token": "abc", "hostType": "gitlab"}]})
        );
    }

    #[test]
    fn single_endpoint_object_is_migrated_as_host_rule() {
        let (is_migrated, config) = migrate(json!({"endpoints": {"platform": "npm"}}));
        assert!(is_migrated);
        assert_eq!(config, json!({"hostRules": {"hostType": "npm"}}));
        assert_eq!(migrate(config.clone()), (false, config));
    }

    #[test]
    fn falsy_endpoints_are_dropped() {
        assert_eq!(migrate(json!({"endpoints": null})), (true, json!({})));
    }

    #[test]
    fn input_is_not_mutated() {
        let config = json!({"packages": [{"packageName": "a", "pinVersions": true}], "gitFs": true});
        let before = config.clone();
        let _ = Migrator::default().migrate(&config).unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn errors_propagate_from_nested_levels() {
        let err = Migrator::default()
            .migrate(&json!({"major": {"packageRules": [{"packages": "x"}]}}))
            .unwrap_err();
        assert_eq!(err, MigrationError::unexpected_shape("packages", "array", &json!("x")));
    }

    #[test]
    fn depth_guard() {
        let config = json!({"a": {"b": {"c": {"pinVersions": true}}}});
        let shallow = Migrator::default().with_max_depth(2);
        assert_eq!(shallow.migrate(&config).unwrap_err(), MigrationError::DepthExceeded { limit: 2 });

        let deep = Migrator::default().with_max_depth(3);
        assert!(deep.migrate(&config).unwrap().is_migrated);
    }

    #[test]
    fn custom_registry_drives_coercion() {
        let mut registry = OptionRegistry::new();
        registry.register("custom", OptionType::Object).unwrap();
        let migrator = Migrator::new(registry);
        let result = migrator.migrate(&json!({"custom": true, "lockFileMaintenance": true})).unwrap();
        assert_eq!(
            result.into_value(),
            json!({"custom": {"enabled": true}, "lockFileMaintenance": true})
        );
    }

    #[test]
    fn migrate_with_parent_applies_context_rules() {
        let rule = json!({"host": "example.com"});
        let result = Migrator::default()
            .migrate_with_parent(rule.as_object().unwrap(), ParentKey::Key("hostRules"))
            .unwrap();
        assert_eq!(result.into_value(), json!({"hostName": "example.com"}));
    }

    #[test]
    fn migrator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Migrator>();
    }
}
