//! macOS code signing orchestration for build outputs
//!
//! This library decides which files produced by a build need a code signature
//! and drives the `codesign` tool over them:
//! - loose Mach-O binaries, `.dylib`/`.so` libraries and `.dmg` images
//! - main executables in `Contents/MacOS` of `.app` bundles
//! - the `.app` bundles themselves, once, after their members
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod settings;
pub mod signing;

// Re-export commonly used types
pub use error::{CliError, CodesignError, Result};
pub use settings::{SigningConfig, SigningRules};
pub use signing::{Classifier, FileRef, Signer, SigningOrchestrator, SigningReport};
