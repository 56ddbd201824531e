//! Testing utilities for cfgmig workspace
//!
//! Shared fixtures and assertions.

#![allow(missing_docs)]

use cfgmig_core::{MigratedConfig, Migrator};
use cfgmig_schema::OptionRegistry;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

pub fn default_migrator() -> Migrator {
    Migrator::new(OptionRegistry::with_defaults())
}

pub fn migrate(config: &Value) -> MigratedConfig {
    default_migrator().migrate(config).unwrap()
}

/// Assert one migration pass turns `input` into `expected` and flags it
pub fn assert_migrates_to(input: Value, expected: Value) {
    let result = migrate(&input);
    assert!(result.is_migrated, "expected {input} to need migration");
    assert_eq!(result.into_value(), expected);
}

/// Assert `config` is already current
pub fn assert_current(config: Value) {
    let result = migrate(&config);
    assert!(!result.is_migrated, "expected {config} to be current");
    assert_eq!(result.into_value(), config);
}

/// Assert migrating the output of a migration changes nothing
pub fn assert_idempotent(config: &Value) {
    let once = migrate(config).into_value();
    let twice = migrate(&once);
    assert!(!twice.is_migrated, "second pass migrated {once}");
    assert_eq!(twice.into_value(), once);
}

/// Check whether `key` appears in any mapping of the tree
pub fn contains_key_anywhere(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key(key) || map.values().any(|child| contains_key_anywhere(child, key))
        }
        Value::Array(items) => items.iter().any(|item| contains_key_anywhere(item, key)),
        _ => false,
    }
}

/// Representative legacy configurations, one per era of the schema
pub fn legacy_corpus() -> Vec<Value> {
    vec![
        json!({
            "maintainYarnLock": true,
            "yarnMaintenanceBranchName": "yarn",
            "pinVersions": true,
            "automerge": "minor",
            "semanticPrefix": "chore(deps): ",
            "commitMessage": "{{semanticPrefix}}Update {{depName}} to {{newVersion}}",
            "schedule": "after 10pm and before 5am every weekday",
        }),
        json!({
            "extends": [":js-app", "config:base"],
            "dependencies": {"automergeMinor": true, "packageRules": [{"packageName": "x"}]},
            "devDependencies": {"pinVersions": false},
            "packages": [{"packagePattern": "^@types/", "automerge": "any"}],
            "depTypes": [{"depType": "peerDependencies", "upgradeInRange": true}],
        }),
        json!({
            "packageFiles": [
                "package.json",
                {"packageFile": "web/package.json", "exposeEnv": true, "separatePatchReleases": true},
            ],
            "pathRules": [{"paths": ["api/"], "versionStrategy": "widen"}],
            "ignoreNodeModules": true,
        }),
        json!({
            "platform": "gitlab",
            "endpoints": [{"platform": "npm", "host": "registry.example.com", "endpoint": "https://registry.example.com/"}],
            "hostRules": [{"platform": "docker"}],
            "node": {"enabled": true, "supportPolicy": ["lts"]},
            "lockFileMaintenance": true,
            "raiseDeprecationWarnings": false,
            "gomodTidy": true,
        }),
        json!({
            "baseBranch": "develop",
            "automergeType": "branch-push",
            "renovateFork": "true",
            "multipleMajorPrs": true,
            "separateMajorReleases": false,
            "excludedPackageNames": ["left-pad"],
            "gitFs": "https",
            "schedule": ["on the last day of the month", "every friday", "before 3am on every weekday"],
            "major": {"automergePatch": 1, "schedule": "after 11pm and before 6am every day"},
        }),
    ]
}
