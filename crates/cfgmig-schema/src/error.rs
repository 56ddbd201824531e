//! Error types for the schema crate
//!
//! - Registry construction (option definitions)
//! - Configuration documents (JSON/YAML ingress and egress)

/// Errors building an option registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Option definition names a kind the registry does not know
    #[error("unknown option type: '{0}'")]
    UnknownType(String),

    /// Definitions document is not valid JSON
    #[error("invalid option definitions: {0}")]
    InvalidDefinitions(#[from] serde_json::Error),

    /// Same option declared twice with different kinds
    #[error("option '{name}' declared as both {first} and {second}")]
    ConflictingDefinition {
        name: String,
        first: crate::OptionType,
        second: crate::OptionType,
    },
}

/// Errors loading or saving a configuration document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Configuration root must be a mapping
    #[error("configuration root must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
