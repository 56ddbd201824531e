//! Error types for the migration engine
//!
//! Migration has a single real failure category: a rule's assumption about a
//! value's shape is violated by malformed input. Harmless oddities (a boolean
//! where a string would also do) are skipped by the rules instead.

use cfgmig_schema::kind_of;
use serde_json::Value;

/// Errors raised while migrating a configuration tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// A rule expected a different value shape under this key
    #[error("unexpected shape for '{key}': expected {expected}, found {found}")]
    UnexpectedShape {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Only mappings can be migrated
    #[error("expected an object to migrate, found {found}")]
    NotAnObject { found: &'static str },

    /// Nesting exceeded the configured depth guard
    #[error("configuration nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

impl MigrationError {
    /// Create unexpected-shape error for key
    pub fn unexpected_shape(key: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self::UnexpectedShape {
            key: key.into(),
            expected,
            found: kind_of(found),
        }
    }

    /// Create not-an-object error for value
    #[must_use]
    pub fn not_an_object(found: &Value) -> Self {
        Self::NotAnObject {
            found: kind_of(found),
        }
    }
}

/// Result type alias for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;
