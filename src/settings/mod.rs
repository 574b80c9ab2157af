//! Configuration structures for codesign operations.
//!
//! This module provides the read-only signing identity configuration,
//! the classifier's eligibility rules, and loading of the `[codesign]`
//! config file table.

mod config;
mod file;
mod rules;

pub use config::SigningConfig;
pub use file::{CodesignSection, load_config_file, parse_config};
pub use rules::{DEFAULT_EXTENSIONS, DEFAULT_NAME_PREFIXES, SigningRules};
