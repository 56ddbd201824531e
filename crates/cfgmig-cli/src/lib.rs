//! cfgmig CLI
//!
//! `cfgmig migrate` rewrites a JSON or YAML configuration file into the
//! current schema; `cfgmig check` reports whether a file still needs that.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::command;
pub use commands::{check, migrate, run, InputOptions, MigrateOptions};
