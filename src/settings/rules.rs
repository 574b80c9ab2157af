//! Eligibility rules for individually signed files.

use std::collections::BTreeSet;

/// File extensions that always need an individual signature.
///
/// Matched against the final extension including the leading dot, case-sensitively.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".dylib", ".so", ".dmg"];

/// File name prefixes that need an individual signature.
///
/// Covers embedded interpreters shipped outside `Contents/MacOS`,
/// e.g. `Contents/Resources/lib/python3.11`.
pub const DEFAULT_NAME_PREFIXES: &[&str] = &["python"];

/// Name and extension rules consulted by the [`Classifier`](crate::signing::Classifier).
///
/// Rules are plain values handed to the classifier at construction; nothing
/// here is global or mutable after the fact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningRules {
    extensions: BTreeSet<String>,
    name_prefixes: BTreeSet<String>,
}

impl Default for SigningRules {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            name_prefixes: DEFAULT_NAME_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SigningRules {
    /// Creates rules with explicit extension and prefix sets.
    pub fn new<E, P>(extensions: E, name_prefixes: P) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            name_prefixes: name_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Replaces the extension set, keeping the name prefixes.
    pub fn with_extensions<E>(mut self, extensions: E) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the name prefix set, keeping the extensions.
    pub fn with_name_prefixes<P>(mut self, name_prefixes: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        self.name_prefixes = name_prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Extensions (with leading dot) that make a file eligible.
    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    /// Base name prefixes that make a file eligible.
    pub fn name_prefixes(&self) -> &BTreeSet<String> {
        &self.name_prefixes
    }

    /// Whether `suffix` (e.g. `".so"`) is in the extension set.
    pub fn matches_extension(&self, suffix: &str) -> bool {
        self.extensions.contains(suffix)
    }

    /// Whether `base_name` starts with any configured prefix.
    pub fn matches_name_prefix(&self, base_name: &str) -> bool {
        self.name_prefixes
            .iter()
            .any(|prefix| base_name.starts_with(prefix.as_str()))
    }
}
