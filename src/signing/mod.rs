//! macOS code signing orchestration.
//!
//! This module decides which build outputs need a code signature and signs
//! them in the right order: loose binaries and libraries first, enclosing
//! `.app` bundles last, each bundle exactly once.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_codesign::settings::SigningConfig;
//! use kodegen_bundler_codesign::signing::{
//!     Classifier, FileRef, ProcessRunner, Signer, SigningOrchestrator,
//! };
//!
//! # async fn example() -> kodegen_bundler_codesign::signing::Result<()> {
//! let config = SigningConfig::new(
//!     "Developer ID Application: Your Name (TEAMID)",
//!     "entitlements.plist",
//! );
//! let signer = Signer::new(ProcessRunner::detect()?, config);
//! let orchestrator = SigningOrchestrator::new(Classifier::default(), signer);
//!
//! let files = vec![
//!     FileRef::new("/out", "Foo.app/Contents/MacOS/Foo")?,
//!     FileRef::new("/out", "standalone.dylib")?,
//! ];
//! let report = orchestrator.sign_all(&files).await;
//! println!("Signed {} files", report.signed_files.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`classifier`] - bundle layout predicates and eligibility rules
//! - [`file_ref`] - file and bundle descriptors
//! - [`orchestrator`] - per-file and per-bundle signing passes
//! - [`runner`] - real and recording command execution
//! - [`signer`] - the remove-then-sign protocol

pub mod classifier;
mod error;
pub mod file_ref;
pub mod orchestrator;
pub mod runner;
pub mod signer;

pub use classifier::{BUNDLE_SUFFIX, Classifier};
pub use error::{Error, Result};
pub use file_ref::{BundleRef, FileRef};
pub use orchestrator::{SigningFailure, SigningOrchestrator, SigningReport};
pub use runner::{CommandInvocation, CommandOutput, CommandRunner, ProcessRunner, RecordingRunner};
pub use signer::{FailurePolicy, Signer};
