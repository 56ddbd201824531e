//! cfgmig Core - legacy configuration migration engine
//!
//! Rewrites configuration trees authored against any historical version of
//! the schema into the current canonical form:
//! - An ordered table of per-key rules, each a predicate plus a transform
//! - A depth-first walk that applies them with knowledge of the parent key
//! - A schedule rewriter that splits time windows wrapping midnight
//!
//! Migration is pure: the input is never mutated and a second migration of
//! the output reports nothing left to migrate.
//!
//! # Example
//!
//! ```
//! use cfgmig_core::Migrator;
//! use serde_json::json;
//!
//! let migrator = Migrator::default();
//! let result = migrator
//!     .migrate(&json!({"automerge": "minor", "dependencies": {"pinVersions": false}}))
//!     .unwrap();
//!
//! assert!(result.is_migrated);
//! assert_eq!(
//!     result.into_value(),
//!     json!({
//!         "packageRules": [{"rangeStrategy": "replace", "depTypeList": ["dependencies"]}],
//!         "minor": {"automerge": true},
//!         "major": {"automerge": false}
//!     })
//! );
//! ```

#![warn(unreachable_pub)]

pub mod context;
pub mod error;
pub mod migrator;
pub mod rules;
pub mod schedule;

pub use context::ParentKey;
pub use error::{MigrationError, MigrationResult};
pub use migrator::{MigratedConfig, Migrator};
pub use rules::{Outcome, Rule, RuleInput, DEP_TYPES, REMOVED_OPTIONS, RULES};
pub use schedule::{migrate_schedule, ScheduleMigration};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
