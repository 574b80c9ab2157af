//! Error types for codesign invocations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for signing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while classifying or signing build outputs.
#[derive(Error, Debug)]
pub enum Error {
    /// The signing tool is not installed or not on PATH
    #[error("{tool} not found in PATH: {source}")]
    ToolNotFound {
        /// Tool name that was looked up
        tool: String,
        /// Lookup failure
        #[source]
        source: which::Error,
    },

    /// The external command could not be started
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The external command ran and exited unsuccessfully
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// A relative path was absolute, empty, or outside its base directory
    #[error("invalid relative path {path:?} (base directory {base_dir:?})")]
    InvalidRelativePath {
        /// Base directory the path was resolved against
        base_dir: PathBuf,
        /// Offending path
        path: PathBuf,
    },
}
