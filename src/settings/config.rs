//! Signing identity configuration.

use std::path::{Path, PathBuf};

/// Identity and entitlements used for every `codesign --sign` call.
///
/// # Configuration
///
/// Add to the codesign config file:
///
/// ```toml
/// [codesign]
/// identity = "Developer ID Application: Your Name (TEAMID)"
/// entitlements = "entitlements.plist"
/// ```
///
/// or export `MACOS_CODESIGN_IDENTITY` and `MACOS_ENTITLEMENTS_FILE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningConfig {
    /// Code signing identity name.
    ///
    /// Example: "Developer ID Application: Your Name (TEAMID)"
    ///
    /// Use "-" for ad-hoc signing (development only).
    pub signing_identity: String,

    /// Path to the entitlements plist passed via `--entitlements=`.
    pub entitlements_file: PathBuf,
}

impl SigningConfig {
    /// Creates a config from an identity and entitlements path.
    pub fn new(signing_identity: impl Into<String>, entitlements_file: impl Into<PathBuf>) -> Self {
        Self {
            signing_identity: signing_identity.into(),
            entitlements_file: entitlements_file.into(),
        }
    }

    /// Signing identity passed to `--sign`.
    pub fn signing_identity(&self) -> &str {
        &self.signing_identity
    }

    /// Entitlements file passed to `--entitlements=`.
    pub fn entitlements_file(&self) -> &Path {
        &self.entitlements_file
    }
}
