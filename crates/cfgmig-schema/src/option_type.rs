//! Declared option kinds
//!
//! Every option in the current schema declares the primitive shape its value
//! must have. Generic coercion rules consult this to repair legacy shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Primitive kind declared for a configuration option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// `true` / `false`
    Boolean,
    /// Free-form string
    String,
    /// Whole number
    Integer,
    /// Nested mapping of further options
    Object,
    /// Ordered list
    Array,
}

impl OptionType {
    /// All kinds, in declaration order
    pub const ALL: [OptionType; 5] = [
        OptionType::Boolean,
        OptionType::String,
        OptionType::Integer,
        OptionType::Object,
        OptionType::Array,
    ];

    /// Lowercase name as used in option definitions
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Boolean => "boolean",
            OptionType::String => "string",
            OptionType::Integer => "integer",
            OptionType::Object => "object",
            OptionType::Array => "array",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownType(s.to_string()))
    }
}
