//! Comprehensive error types for codesign operations.
//!
//! This module defines the crate-level error type returned by the CLI layer.
//! Signing-specific failures live in [`crate::signing::Error`] and are wrapped here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for codesign operations
pub type Result<T> = std::result::Result<T, CodesignError>;

/// Main error type for all codesign operations
#[derive(Error, Debug)]
pub enum CodesignError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Signing errors
    #[error("Signing error: {0}")]
    Signing(#[from] crate::signing::Error),

    /// Build output enumeration errors
    #[error("Failed to enumerate {path}: {source}")]
    Walk {
        /// Directory being enumerated
        path: PathBuf,
        /// Underlying walkdir error
        #[source]
        source: walkdir::Error,
    },

    /// Generic errors from anyhow, rendered with their cause chain
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn anyhow_errors_keep_their_cause() {
        let missing: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "codesign not found in PATH",
        ));

        let err: CodesignError = missing
            .context("codesign is required to sign")
            .unwrap_err()
            .into();

        assert_eq!(
            err.to_string(),
            "codesign is required to sign: codesign not found in PATH"
        );
    }
}
