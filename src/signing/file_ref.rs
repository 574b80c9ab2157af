//! File descriptors for build outputs.
//!
//! A [`FileRef`] pairs the directory a build step wrote into with the path of
//! one output relative to it. Classification only ever looks at the relative
//! part; signing only ever uses the absolute one.

use super::error::{Error, Result};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// An output file identified by its base directory and relative path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileRef {
    base_dir: PathBuf,
    relative_path: PathBuf,
}

impl FileRef {
    /// Creates a descriptor for `relative_path` under `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRelativePath`] if `relative_path` is empty,
    /// absolute, or climbs out of `base_dir` via `..`.
    pub fn new(base_dir: impl Into<PathBuf>, relative_path: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.into();
        let raw = relative_path.as_ref();

        let mut normalized = PathBuf::new();
        for component in raw.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::InvalidRelativePath {
                        base_dir,
                        path: raw.to_path_buf(),
                    });
                }
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(Error::InvalidRelativePath {
                base_dir,
                path: raw.to_path_buf(),
            });
        }

        Ok(Self {
            base_dir,
            relative_path: normalized,
        })
    }

    /// Creates a descriptor from an absolute path that lives under `base_dir`.
    pub fn from_absolute(base_dir: impl Into<PathBuf>, absolute_path: &Path) -> Result<Self> {
        let base_dir = base_dir.into();
        match absolute_path.strip_prefix(&base_dir) {
            Ok(relative) => {
                let relative = relative.to_path_buf();
                Self::new(base_dir, relative)
            }
            Err(_) => Err(Error::InvalidRelativePath {
                base_dir,
                path: absolute_path.to_path_buf(),
            }),
        }
    }

    /// Directory the relative path is resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path relative to [`base_dir`](Self::base_dir).
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Full on-disk path of the file.
    pub fn absolute_path(&self) -> PathBuf {
        self.base_dir.join(&self.relative_path)
    }

    /// Segments of the relative path, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &OsStr> {
        self.relative_path.iter()
    }

    /// Final segment of the relative path.
    pub fn file_name(&self) -> Option<&OsStr> {
        self.relative_path.file_name()
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path.display())
    }
}

/// An application bundle directory derived from one of its member files.
///
/// The relative path is always a single segment ending in the bundle suffix.
/// Only [`Classifier`](super::Classifier) code constructs these.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BundleRef(FileRef);

impl BundleRef {
    pub(crate) fn from_member(member: &FileRef, bundle_name: &OsStr) -> Self {
        Self(FileRef {
            base_dir: member.base_dir.clone(),
            relative_path: PathBuf::from(bundle_name),
        })
    }

    /// The bundle as a plain file descriptor, suitable for signing.
    pub fn as_file_ref(&self) -> &FileRef {
        &self.0
    }

    /// Bundle directory name relative to the base directory, e.g. `Foo.app`.
    pub fn relative_path(&self) -> &Path {
        self.0.relative_path()
    }
}

impl fmt::Display for BundleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
