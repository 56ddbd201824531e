use cfgmig_core::{MigrationError, Migrator, ParentKey, REMOVED_OPTIONS};
use cfgmig_schema::{OptionRegistry, OptionType};
use cfgmig_test_utils::{
    assert_current, assert_idempotent, assert_migrates_to, contains_key_anywhere, legacy_corpus, migrate,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_empty_config() {
    let result = migrate(&json!({}));
    assert!(!result.is_migrated);
    assert!(result.config.is_empty());
}

#[test]
fn test_host_rule_context() {
    assert_migrates_to(
        json!({"hostRules": [{"platform": "npm"}], "platform": "github"}),
        json!({"hostRules": [{"hostType": "npm"}], "platform": "github"}),
    );
    assert_current(json!({"platform": "github", "endpoint": "https://api.github.com/"}));
}

#[test]
fn test_dependency_folding() {
    assert_migrates_to(
        json!({"dependencies": {"automerge": true}}),
        json!({"packageRules": [{"automerge": true, "depTypeList": ["dependencies"]}]}),
    );
}

#[test]
fn test_all_dependency_sections_fold_in_order() {
    let result = migrate(&json!({
        "peerDependencies": {"enabled": false},
        "dependencies": {"labels": ["deps"]}
    }));
    assert_eq!(
        result.into_value(),
        json!({"packageRules": [
            {"enabled": false, "depTypeList": ["peerDependencies"]},
            {"labels": ["deps"], "depTypeList": ["dependencies"]}
        ]})
    );
}

#[test]
fn test_schedule_split() {
    assert_migrates_to(
        json!({"schedule": "after 10pm and before 5am"}),
        json!({"schedule": ["after 10pm", "before 5am"]}),
    );
    assert_current(json!({"schedule": "after 9am and before 5pm"}));
}

#[test]
fn test_automerge_minor() {
    assert_migrates_to(
        json!({"automerge": "minor"}),
        json!({"minor": {"automerge": true}, "major": {"automerge": false}}),
    );
}

#[test]
fn test_automerge_patch_keeps_existing_fields() {
    assert_migrates_to(
        json!({"major": {"labels": ["major"]}, "automerge": "patch"}),
        json!({
            "major": {"labels": ["major"], "automerge": false},
            "patch": {"automerge": true},
            "minor": {"automerge": false}
        }),
    );
}

#[test]
fn test_packages_must_be_list() {
    let err = Migrator::default().migrate(&json!({"packages": "x"})).unwrap_err();
    assert!(matches!(err, MigrationError::UnexpectedShape { ref key, expected: "array", found: "string" } if key == "packages"));
}

#[test]
fn test_package_override_must_be_object() {
    let err = Migrator::default().migrate(&json!({"packages": ["lodash"]})).unwrap_err();
    assert_eq!(err.to_string(), "unexpected shape for 'packages': expected object, found string");
}

#[test]
fn test_legacy_corpus_is_migrated() {
    for config in legacy_corpus() {
        let result = migrate(&config);
        assert!(result.is_migrated, "{config} should need migration");
    }
}

#[test]
fn test_legacy_corpus_is_idempotent() {
    for config in legacy_corpus() {
        assert_idempotent(&config);
    }
}

#[test]
fn test_legacy_corpus_drops_removed_options() {
    for config in legacy_corpus() {
        let migrated = migrate(&config).into_value();
        for removed in REMOVED_OPTIONS {
            assert!(!contains_key_anywhere(&migrated, removed), "{removed} survived in {migrated}");
        }
        assert!(!contains_key_anywhere(&migrated, "gitFs"));
    }
}

#[test]
fn test_full_legacy_config() {
    let input = json!({
        "extends": [":library"],
        "maintainYarnLock": true,
        "semanticPrefix": "build: ",
        "packageFiles": [{"packageFile": "app/package.json", "pinVersions": true}],
        "packages": [{"packageName": "react", "separateMajorReleases": true}],
        "node": true,
        "raiseDeprecationWarnings": false
    });
    assert_migrates_to(
        input,
        json!({
            "extends": ["config:js-lib"],
            "semanticCommitType": "build",
            "semanticCommitScope": null,
            "packageRules": [
                {"rangeStrategy": "pin", "paths": ["app/package.json"]},
                {"packageNames": ["react"], "separateMajorMinor": true}
            ],
            "includePaths": ["app/package.json"],
            "travis": {"enabled": true},
            "suppressNotifications": ["deprecationWarningIssues"]
        }),
    );
}

#[test]
fn test_node_rule_is_idempotent() {
    assert_idempotent(&json!({"node": true}));
    assert_idempotent(&json!({"node": {"enabled": true, "automerge": "any"}}));
}

#[test]
fn test_nested_endpoints_under_host_rules() {
    assert_migrates_to(
        json!({"endpoints": [{"platform": "bitbucket", "endpoint": "https://bb.example.com/"}]}),
        json!({"hostRules": [{"hostType": "bitbucket", "baseUrl": "https://bb.example.com/"}]}),
    );
}

#[test]
fn test_single_endpoint_object() {
    assert_migrates_to(
        json!({"endpoints": {"platform": "npm"}}),
        json!({"hostRules": {"hostType": "npm"}}),
    );
    assert_idempotent(&json!({"endpoints": {"platform": "npm", "host": "registry.example.com"}}));
}

#[test]
fn test_wrapped_legacy_strings_migrate_in_one_pass() {
    assert_migrates_to(
        json!({"commitMessage": ["Update to {{newVersion}}"], "automergeType": ["branch-push"]}),
        json!({"commitMessage": "Update to {{newValue}}", "automergeType": "branch"}),
    );
    assert_idempotent(&json!({"prTitle": ["{{semanticPrefix}}Update"]}));
}

#[test]
fn test_definitions_from_json_registry() {
    let registry = OptionRegistry::from_json(r#"[{"name": "travis", "type": "object"}]"#).unwrap();
    assert_eq!(registry.type_of("travis"), Some(OptionType::Object));

    let migrator = Migrator::new(registry);
    let result = migrator.migrate(&json!({"travis": false, "lockFileMaintenance": false})).unwrap();
    assert_eq!(
        result.into_value(),
        json!({"travis": {"enabled": false}, "lockFileMaintenance": false})
    );
}

#[test]
fn test_migrate_with_parent() {
    let rule = json!({"endpoint": "https://example.com/", "platform": "npm"});
    let result = Migrator::default()
        .migrate_with_parent(rule.as_object().unwrap(), ParentKey::from("hostRules"))
        .unwrap();
    assert!(result.is_migrated);
    assert_eq!(
        result.into_value(),
        json!({"baseUrl": "https://example.com/", "hostType": "npm"})
    );
}
