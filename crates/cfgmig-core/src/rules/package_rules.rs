//! Rules that fold legacy per-package overrides into `packageRules`
//!
//! Every override is migrated on its own, under the key it was found in,
//! before it is appended.

use serde_json::{Map, Value};

use super::{array_entry, expect_array, expect_object, is_truthy, Outcome, RuleInput};
use crate::error::MigrationError;
use crate::migrator::Migrator;

/// Legacy top-level dependency-type sections
pub const DEP_TYPES: &[&str] = &[
    "dependencies",
    "devDependencies",
    "optionalDependencies",
    "peerDependencies",
];

const PACKAGE_RULES: &str = "packageRules";

/// Migrate an override one level down, under the rule's own key
fn migrate_override(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    value: &Value,
) -> Result<Map<String, Value>, MigrationError> {
    let override_config = expect_object(input.key, value)?;
    let result = migrator.migrate_at(override_config, input.child_parent(), input.depth + 1)?;
    Ok(result.config)
}

fn single(value: Value) -> Value {
    Value::Array(vec![value])
}

pub(super) fn is_path_rules(input: &RuleInput<'_>) -> bool {
    input.key == "pathRules"
}

pub(super) fn fold_path_rules(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    if let Some(path_rules) = input.value.as_array() {
        let rules = path_rules
            .iter()
            .map(|rule| migrate_override(migrator, input, rule).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        array_entry(migrated, PACKAGE_RULES)?.splice(0..0, rules);
    }
    migrated.shift_remove(input.key);
    Ok(Outcome::Migrated)
}

pub(super) fn is_package_files(input: &RuleInput<'_>) -> bool {
    input.key == "packageFiles" && input.value.is_array()
}

pub(super) fn split_package_files(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let entries = expect_array(input.key, input.value)?;
    let mut include_paths = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(fields) = entry.as_object() else {
            include_paths.push(entry.clone());
            continue;
        };
        let file = fields
            .get("packageFile")
            .cloned()
            .ok_or_else(|| MigrationError::unexpected_shape("packageFile", "string", &Value::Null))?;
        include_paths.push(file.clone());
        if fields.len() <= 1 {
            continue;
        }

        let mut payload = migrate_override(migrator, input, entry)?;
        let mut scoped = Vec::new();
        if let Some(nested) = payload.shift_remove(PACKAGE_RULES).filter(is_truthy) {
            for subrule in expect_array(PACKAGE_RULES, &nested)? {
                let mut subrule = expect_object(PACKAGE_RULES, subrule)?.clone();
                subrule.insert("paths".to_string(), single(file.clone()));
                scoped.push(Value::Object(subrule));
            }
        }
        payload.shift_remove("packageFile");
        if !payload.is_empty() {
            payload.insert("paths".to_string(), single(file));
            scoped.push(Value::Object(payload));
        }
        array_entry(migrated, PACKAGE_RULES)?.extend(scoped);
    }

    migrated.insert("includePaths".to_string(), Value::Array(include_paths));
    migrated.shift_remove(input.key);
    Ok(Outcome::Migrated)
}

pub(super) fn is_dep_type_key(input: &RuleInput<'_>) -> bool {
    DEP_TYPES.contains(&input.key)
}

pub(super) fn fold_dep_type(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let mut rule = migrate_override(migrator, input, input.value)?;
    rule.shift_remove(PACKAGE_RULES);
    rule.insert("depTypeList".to_string(), single(Value::from(input.key)));
    array_entry(migrated, PACKAGE_RULES)?.push(Value::Object(rule));
    migrated.shift_remove(input.key);
    Ok(Outcome::Migrated)
}

pub(super) fn is_packages(input: &RuleInput<'_>) -> bool {
    input.key == "packages"
}

pub(super) fn fold_packages(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let rules = expect_array(input.key, input.value)?
        .iter()
        .map(|package| migrate_override(migrator, input, package).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    array_entry(migrated, PACKAGE_RULES)?.extend(rules);
    migrated.shift_remove(input.key);
    Ok(Outcome::Migrated)
}

pub(super) fn is_dep_types_list(input: &RuleInput<'_>) -> bool {
    input.key == "depTypes" && input.value.is_array()
}

pub(super) fn fold_dep_types(
    migrator: &Migrator,
    input: &RuleInput<'_>,
    migrated: &mut Map<String, Value>,
) -> Result<Outcome, MigrationError> {
    let entries = expect_array(input.key, input.value)?;
    for entry in entries {
        let Some(name) = entry.get("depType").filter(|name| is_truthy(name)) else {
            continue;
        };
        let name = name.clone();
        let mut rule = migrate_override(migrator, input, entry)?;
        rule.shift_remove("depType");
        rule.insert("depTypeList".to_string(), single(name));
        array_entry(migrated, PACKAGE_RULES)?.push(Value::Object(rule));
    }
    migrated.shift_remove(input.key);
    Ok(Outcome::Migrated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::find;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn apply(key: &str, value: Value, mut migrated: Map<String, Value>) -> Result<Map<String, Value>, MigrationError> {
        let migrator = Migrator::default();
        migrated.insert(key.to_string(), value.clone());
        let input = RuleInput::new(key, &value);
        let rule = find(&input).expect("rule should claim key");
        assert_eq!(rule.apply(&migrator, &input, &mut migrated)?, Outcome::Migrated);
        Ok(migrated)
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn path_rules_are_prepended() {
        let existing = object(json!({"packageRules": [{"packageNames": ["a"]}]}));
        let migrated = apply("pathRules", json!([{"paths": ["web/"], "pinVersions": true}]), existing).unwrap();
        assert_eq!(
            Value::Object(migrated),
            json!({"packageRules": [
                {"paths": ["web/"], "rangeStrategy": "pin"},
                {"packageNames": ["a"]}
            ]})
        );
    }

    #[test]
    fn non_array_path_rules_are_dropped() {
        let migrated = apply("pathRules", json!("web/"), Map::new()).unwrap();
        assert!(migrated.is_empty());
    }

    #[test]
    fn package_files_split_into_include_paths_and_scoped_rules() {
        let value = json!([
            "package.json",
            {"packageFile": "web/package.json", "automerge": true, "packageRules": [{"packageNames": ["react"]}]},
            {"packageFile": "api/package.json"}
        ]);
        let migrated = apply("packageFiles", value, Map::new()).unwrap();
        assert_eq!(
            Value::Object(migrated),
            json!({
                "packageRules": [
                    {"packageNames": ["react"], "paths": ["web/package.json"]},
                    {"automerge": true, "paths": ["web/package.json"]}
                ],
                "includePaths": ["package.json", "web/package.json", "api/package.json"]
            })
        );
    }

    #[test]
    fn package_file_object_without_name_fails() {
        let err = apply("packageFiles", json!([{"automerge": true}]), Map::new()).unwrap_err();
        assert!(matches!(err, MigrationError::UnexpectedShape { ref key, .. } if key == "packageFile"));
    }

    #[test]
    fn dependency_section_becomes_package_rule() {
        let value = json!({"automerge": true, "packageRules": [{"packageNames": ["x"]}]});
        let migrated = apply("devDependencies", value, Map::new()).unwrap();
        assert_eq!(
            Value::Object(migrated),
            json!({"packageRules": [{"automerge": true, "depTypeList": ["devDependencies"]}]})
        );
    }

    #[test]
    fn dependency_section_must_be_object() {
        let err = apply("dependencies", json!(["lodash"]), Map::new()).unwrap_err();
        assert_eq!(err, MigrationError::unexpected_shape("dependencies", "object", &json!([])));
    }

    #[test]
    fn packages_are_appended() {
        let existing = object(json!({"packageRules": [{"packageNames": ["a"]}]}));
        let migrated = apply("packages", json!([{"packageName": "b", "automerge": "false"}]), existing).unwrap();
        assert_eq!(
            migrated["packageRules"],
            json!([{"packageNames": ["a"]}, {"packageNames": ["b"], "automerge": false}])
        );
    }

    #[test]
    fn packages_string_is_rejected() {
        let err = apply("packages", json!("x"), Map::new()).unwrap_err();
        assert_eq!(err, MigrationError::unexpected_shape("packages", "array", &json!("x")));
    }

    #[test]
    fn dep_types_entries_with_names_become_rules() {
        let value = json!([
            {"depType": "dependencies", "pinVersions": false},
            {"automerge": true},
            "devDependencies"
        ]);
        let migrated = apply("depTypes", value, Map::new()).unwrap();
        assert_eq!(
            Value::Object(migrated),
            json!({"packageRules": [{"rangeStrategy": "replace", "depTypeList": ["dependencies"]}]})
        );
    }
}
