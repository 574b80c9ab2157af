//! Codesign config file loading.

use crate::error::{CliError, CodesignError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::SigningRules;

/// Top-level layout of the config file.
#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    codesign: CodesignSection,
}

/// The `[codesign]` table.
///
/// Every key is optional; CLI flags and environment variables take
/// precedence over values found here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodesignSection {
    /// Signing identity passed to `codesign --sign`.
    #[serde(default)]
    pub identity: Option<String>,

    /// Entitlements plist. Relative paths are resolved against the
    /// directory holding the config file.
    #[serde(default)]
    pub entitlements: Option<PathBuf>,

    /// Surface external command failures instead of swallowing them.
    #[serde(default)]
    pub strict: Option<bool>,

    /// Replaces the default extension set. Entries must start with a dot.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    /// Replaces the default name prefix set.
    #[serde(default)]
    pub name_prefixes: Option<Vec<String>>,
}

impl CodesignSection {
    /// Builds classifier rules, falling back to defaults for unset keys.
    pub fn rules(&self) -> SigningRules {
        let mut rules = SigningRules::default();
        if let Some(extensions) = &self.extensions {
            rules = rules.with_extensions(extensions.iter().cloned());
        }
        if let Some(prefixes) = &self.name_prefixes {
            rules = rules.with_name_prefixes(prefixes.iter().cloned());
        }
        rules
    }
}

/// Load the `[codesign]` table from a TOML file.
///
/// A file without a `[codesign]` table yields all-default values.
pub fn load_config_file(path: &Path) -> Result<CodesignSection> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CodesignError::Cli(CliError::ExecutionFailed {
            command: "read_config".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let mut section = parse_config(&contents)?;

    if let Some(entitlements) = &section.entitlements
        && entitlements.is_relative()
        && !entitlements.as_os_str().is_empty()
        && let Some(parent) = path.parent()
    {
        section.entitlements = Some(parent.join(entitlements));
    }

    log::debug!("Loaded codesign config from {}", path.display());
    Ok(section)
}

/// Parse and validate config file contents.
pub fn parse_config(contents: &str) -> Result<CodesignSection> {
    let document: ConfigDocument = toml::from_str(contents)?;
    let section = document.codesign;

    if let Some(extensions) = &section.extensions
        && let Some(bad) = extensions.iter().find(|ext| !is_dotted_extension(ext))
    {
        return Err(CodesignError::Cli(CliError::InvalidArguments {
            reason: format!(
                "Invalid extension {:?} in [codesign] extensions: expected a leading dot, e.g. \".dylib\"",
                bad
            ),
        }));
    }

    if let Some(prefixes) = &section.name_prefixes
        && prefixes.iter().any(|p| p.is_empty())
    {
        return Err(CodesignError::Cli(CliError::InvalidArguments {
            reason: "Empty entry in [codesign] name_prefixes would match every file".to_string(),
        }));
    }

    Ok(section)
}

fn is_dotted_extension(ext: &str) -> bool {
    ext.len() > 1 && ext.starts_with('.')
}
