//! Built-in option table
//!
//! Current-schema options and their declared kinds. Legacy option names that
//! the migration rules rewrite are deliberately absent.

use crate::option_type::OptionType::{self, Array, Boolean, Integer, Object, String};

/// Declared options, grouped roughly by concern
pub(crate) const BUILTIN_OPTIONS: &[(&str, OptionType)] = &[
    // General
    ("enabled", Boolean),
    ("extends", Array),
    ("description", Array),
    ("timezone", String),
    ("schedule", Array),
    ("updateNotScheduled", Boolean),
    ("dryRun", Boolean),
    ("printConfig", Boolean),
    ("requireConfig", Boolean),
    ("onboarding", Boolean),
    ("includeForks", Boolean),
    ("trustLevel", String),
    ("suppressNotifications", Array),
    ("ignorePaths", Array),
    ("includePaths", Array),
    ("enabledManagers", Array),
    ("ignoreDeps", Array),
    ("baseBranches", Array),
    // Platform and hosts
    ("platform", String),
    ("endpoint", String),
    ("token", String),
    ("username", String),
    ("password", String),
    ("gitAuthor", String),
    ("hostRules", Array),
    ("hostType", String),
    ("baseUrl", String),
    ("hostName", String),
    ("registryUrls", Array),
    // Versioning
    ("rangeStrategy", String),
    ("versionScheme", String),
    ("followTag", String),
    ("allowedVersions", String),
    ("ignoreUnstable", Boolean),
    ("ignoreDeprecated", Boolean),
    ("respectLatest", Boolean),
    ("pinDigests", Boolean),
    ("separateMajorMinor", Boolean),
    ("separateMultipleMajor", Boolean),
    ("separateMinorPatch", Boolean),
    ("postUpdateOptions", Array),
    // Update types
    ("major", Object),
    ("minor", Object),
    ("patch", Object),
    ("pin", Object),
    ("digest", Object),
    ("lockFileMaintenance", Object),
    ("vulnerabilityAlerts", Object),
    ("group", Object),
    ("travis", Object),
    ("node", Object),
    ("npm", Object),
    ("docker", Object),
    // Package rules
    ("packageRules", Array),
    ("depTypeList", Array),
    ("packageNames", Array),
    ("packagePatterns", Array),
    ("excludePackageNames", Array),
    ("excludePackagePatterns", Array),
    ("paths", Array),
    ("languages", Array),
    ("managers", Array),
    // Automerge
    ("automerge", Boolean),
    ("automergeType", String),
    ("requiredStatusChecks", Array),
    // Branches and commits
    ("branchPrefix", String),
    ("branchName", String),
    ("branchTopic", String),
    ("groupName", String),
    ("groupSlug", String),
    ("semanticCommits", Boolean),
    ("semanticCommitType", String),
    ("semanticCommitScope", String),
    ("commitMessage", String),
    ("commitMessagePrefix", String),
    ("commitMessageAction", String),
    ("commitMessageTopic", String),
    ("commitMessageExtra", String),
    ("commitMessageSuffix", String),
    ("commitBody", String),
    ("recreateClosed", Boolean),
    ("rebaseStalePrs", Boolean),
    ("unpublishSafe", Boolean),
    // Pull requests
    ("prCreation", String),
    ("prTitle", String),
    ("prHourlyLimit", Integer),
    ("prConcurrentLimit", Integer),
    ("prNotPendingHours", Integer),
    ("labels", Array),
    ("assignees", Array),
    ("reviewers", Array),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_names_are_unique() {
        let mut seen = HashSet::new();
        for (name, _) in BUILTIN_OPTIONS {
            assert!(seen.insert(*name), "duplicate option {name}");
        }
    }
}
