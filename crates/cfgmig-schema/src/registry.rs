//! Option type registry
//!
//! Provides [`OptionRegistry`], the read-only lookup from option name to its
//! declared [`OptionType`]. A registry is built once and then shared; it is
//! never mutated while a migration runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::definitions::BUILTIN_OPTIONS;
use crate::error::RegistryError;
use crate::option_type::OptionType;

/// A single option declaration as found in definition documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    /// Option name as it appears in configuration
    pub name: String,

    /// Declared kind
    #[serde(rename = "type")]
    pub option_type: OptionType,
}

impl OptionDefinition {
    /// Create new definition
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, option_type: OptionType) -> Self {
        Self {
            name: name.into(),
            option_type,
        }
    }
}

/// Lookup table from option name to declared kind
///
/// Definition order is preserved so listings are stable.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OptionRegistry {
    types: IndexMap<String, OptionType>,
}

impl OptionRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Create registry with the built-in option table
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, kind) in BUILTIN_OPTIONS {
            registry.types.insert((*name).to_string(), *kind);
        }
        registry
    }

    /// Build registry from explicit definitions
    ///
    /// # Errors
    /// Returns error if one name is declared with two different kinds
    pub fn from_definitions<I>(definitions: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = OptionDefinition>,
    {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition.name, definition.option_type)?;
        }
        Ok(registry)
    }

    /// Build registry from a JSON array of `{"name": .., "type": ..}`
    ///
    /// # Errors
    /// Returns error if the document is malformed or conflicting
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let definitions: Vec<OptionDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Register an option
    ///
    /// Re-registering with the same kind is a no-op.
    ///
    /// # Errors
    /// Returns error if the name is already declared with another kind
    pub fn register(
        &mut self,
        name: impl Into<String>,
        option_type: OptionType,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        match self.types.get(&name) {
            Some(existing) if *existing != option_type => Err(RegistryError::ConflictingDefinition {
                name,
                first: *existing,
                second: option_type,
            }),
            Some(_) => Ok(()),
            None => {
                self.types.insert(name, option_type);
                Ok(())
            }
        }
    }

    /// Declared kind of an option, if known
    #[inline]
    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<OptionType> {
        self.types.get(name).copied()
    }

    /// Check if option is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Option names in definition order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// Get number of declared options
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all definitions
    pub fn iter(&self) -> impl Iterator<Item = OptionDefinition> + '_ {
        self.types
            .iter()
            .map(|(name, kind)| OptionDefinition::new(name.clone(), *kind))
    }
}
