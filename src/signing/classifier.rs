//! Build output classification.
//!
//! Decides whether a file lives inside an `.app` bundle, whether it is the
//! bundle's main executable, and whether it needs an individual signature.

use super::file_ref::{BundleRef, FileRef};
use crate::settings::SigningRules;
use std::ffi::OsStr;

/// Suffix of the top-level directory of an application bundle.
pub const BUNDLE_SUFFIX: &str = ".app";

/// Segments following the bundle name that lead to the main executable.
const BUNDLE_EXECUTABLE_DIR: [&str; 2] = ["Contents", "MacOS"];

/// Check whether the file comes from an `.app` bundle.
pub fn is_file_from_bundle(file: &FileRef) -> bool {
    file.segments()
        .next()
        .is_some_and(|first| first.to_string_lossy().ends_with(BUNDLE_SUFFIX))
}

/// Get the bundle which contains the file.
///
/// # Panics
///
/// Panics if [`is_file_from_bundle`] is false for `file`; asking for the
/// bundle of a loose file is a caller bug.
pub fn bundle_of(file: &FileRef) -> BundleRef {
    match try_bundle_of(file) {
        Some(bundle) => bundle,
        None => panic!("{} is not inside a {} bundle", file, BUNDLE_SUFFIX),
    }
}

/// Get the bundle which contains the file, if there is one.
pub fn try_bundle_of(file: &FileRef) -> Option<BundleRef> {
    if !is_file_from_bundle(file) {
        return None;
    }
    let bundle_name = file.segments().next()?;
    Some(BundleRef::from_member(file, bundle_name))
}

/// Check whether the file sits in the bundle's `Contents/MacOS` slot.
pub fn is_bundle_executable_file(file: &FileRef) -> bool {
    if !is_file_from_bundle(file) {
        return false;
    }

    let parts: Vec<&OsStr> = file.segments().collect();
    if parts.len() < 3 {
        return false;
    }

    parts[1..3]
        .iter()
        .zip(BUNDLE_EXECUTABLE_DIR)
        .all(|(part, expected)| *part == OsStr::new(expected))
}

/// Decides which build outputs receive an individual signature.
///
/// Bundles themselves are never "eligible" here: a bundle is a directory and
/// is signed separately once its members are done.
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    rules: SigningRules,
}

impl Classifier {
    /// Creates a classifier with the given rules.
    pub fn new(rules: SigningRules) -> Self {
        Self { rules }
    }

    /// Rules this classifier was built with.
    pub fn rules(&self) -> &SigningRules {
        &self.rules
    }

    /// See [`is_file_from_bundle`].
    pub fn is_from_bundle(&self, file: &FileRef) -> bool {
        is_file_from_bundle(file)
    }

    /// See [`bundle_of`].
    pub fn bundle_of(&self, file: &FileRef) -> BundleRef {
        bundle_of(file)
    }

    /// See [`is_bundle_executable_file`].
    pub fn is_bundle_executable(&self, file: &FileRef) -> bool {
        is_bundle_executable_file(file)
    }

    /// Whether the file needs its own signature.
    ///
    /// True for bundle executables, files whose base name starts with a
    /// configured prefix, and files whose extension is configured.
    pub fn is_eligible_for_signing(&self, file: &FileRef) -> bool {
        if is_bundle_executable_file(file) {
            return true;
        }

        let Some(base_name) = file.file_name() else {
            return false;
        };
        let base_name = base_name.to_string_lossy();

        if self.rules.matches_name_prefix(&base_name) {
            return true;
        }

        match file.relative_path().extension() {
            Some(ext) => self
                .rules
                .matches_extension(&format!(".{}", ext.to_string_lossy())),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn file(relative: &str) -> FileRef {
        FileRef::new("/out", relative).unwrap()
    }

    #[test]
    fn loose_files_are_not_from_bundle() {
        let classifier = Classifier::default();
        for relative in [
            "standalone.dylib",
            "bin/tool",
            "Foo.apps/Contents/MacOS/Foo",
            "lib/Foo.app/Contents/MacOS/Foo",
            "Foo.app.zip",
        ] {
            let f = file(relative);
            assert!(!classifier.is_from_bundle(&f), "{relative}");
            assert!(!classifier.is_bundle_executable(&f), "{relative}");
            assert!(try_bundle_of(&f).is_none(), "{relative}");
        }
    }

    #[test]
    fn main_executable_slot() {
        let classifier = Classifier::default();
        let f = file("App.app/Contents/MacOS/App");

        assert!(classifier.is_from_bundle(&f));
        assert!(classifier.is_bundle_executable(&f));
        assert!(classifier.is_eligible_for_signing(&f));
        assert_eq!(classifier.bundle_of(&f).relative_path(), Path::new("App.app"));
        assert_eq!(
            classifier.bundle_of(&f).as_file_ref().absolute_path(),
            Path::new("/out/App.app")
        );
    }

    #[test]
    fn executable_slot_requires_contents_macos_pair() {
        let classifier = Classifier::default();
        assert!(!classifier.is_bundle_executable(&file("App.app")));
        assert!(!classifier.is_bundle_executable(&file("App.app/Contents")));
        assert!(!classifier.is_bundle_executable(&file("App.app/Contents/Info.plist")));
        assert!(!classifier.is_bundle_executable(&file("App.app/MacOS/Contents/App")));
        assert!(!classifier.is_bundle_executable(&file("App.app/contents/macos/App")));
        // Nested deeper under MacOS still counts as the executable slot.
        assert!(classifier.is_bundle_executable(&file("App.app/Contents/MacOS/helpers/tool")));
    }

    #[test]
    fn embedded_python_is_eligible_by_prefix() {
        let classifier = Classifier::default();
        let f = file("App.app/Contents/Resources/python3.11");

        assert!(classifier.is_from_bundle(&f));
        assert!(!classifier.is_bundle_executable(&f));
        assert!(classifier.is_eligible_for_signing(&f));
    }

    #[test]
    fn extension_rules() {
        let classifier = Classifier::default();
        for relative in [
            "standalone.dylib",
            "lib/_ssl.cpython-311-darwin.so",
            "Installer.dmg",
            "App.app/Contents/Resources/lib/libfoo.dylib",
        ] {
            assert!(classifier.is_eligible_for_signing(&file(relative)), "{relative}");
        }
        for relative in [
            "readme.txt",
            "App.app/Contents/Info.plist",
            "LIB.DYLIB",
            "archive.dylib.txt",
            "Makefile",
        ] {
            assert!(!classifier.is_eligible_for_signing(&file(relative)), "{relative}");
        }
    }

    #[test]
    fn injected_rules_replace_defaults() {
        let classifier = Classifier::new(
            SigningRules::default()
                .with_extensions([".txt"])
                .with_name_prefixes(Vec::<String>::new()),
        );
        assert!(classifier.is_eligible_for_signing(&file("readme.txt")));
        assert!(!classifier.is_eligible_for_signing(&file("standalone.dylib")));
        assert!(!classifier.is_eligible_for_signing(&file("bin/python3")));
        assert!(classifier.is_eligible_for_signing(&file("Foo.app/Contents/MacOS/Foo")));
    }

    #[test]
    #[should_panic(expected = "is not inside a .app bundle")]
    fn bundle_of_loose_file_panics() {
        bundle_of(&file("standalone.dylib"));
    }
}
