//! cfgmig Schema
//!
//! The read-only knowledge the migration engine consumes about the current
//! configuration schema, plus document ingress and egress.
//!
//! # Core Concepts
//!
//! - [`OptionType`]: Declared primitive kind of an option
//! - [`OptionRegistry`]: Immutable lookup from option name to kind
//! - [`ConfigDocument`]: Configuration tree with a mapping root, JSON or YAML
//!
//! # Example
//!
//! ```
//! use cfgmig_schema::{OptionRegistry, OptionType};
//!
//! let registry = OptionRegistry::with_defaults();
//! assert_eq!(registry.type_of("automerge"), Some(OptionType::Boolean));
//! ```

#![warn(unreachable_pub)]

mod definitions;
pub mod document;
pub mod error;
mod option_type;
mod registry;

pub use document::{kind_of, ConfigDocument, DocumentFormat};
pub use error::{DocumentError, RegistryError};
pub use option_type::OptionType;
pub use registry::{OptionDefinition, OptionRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
