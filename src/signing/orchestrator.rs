//! Signing orchestration over a batch of build outputs.
//!
//! Individual files are signed first; enclosing `.app` bundles are signed
//! last, each exactly once.

use super::classifier::Classifier;
use super::file_ref::{BundleRef, FileRef};
use super::runner::CommandRunner;
use super::signer::Signer;
use std::collections::HashSet;
use std::path::PathBuf;

/// A file or bundle whose signing failed under the strict policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningFailure {
    /// Path relative to the base directory
    pub path: PathBuf,
    /// Rendered error
    pub reason: String,
}

/// What happened to each input during one [`SigningOrchestrator::sign_all`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SigningReport {
    /// Files signed individually, in input order
    pub signed_files: Vec<FileRef>,
    /// Files that were not eligible, in input order
    pub ignored_files: Vec<FileRef>,
    /// Bundles signed, in discovery order
    pub signed_bundles: Vec<BundleRef>,
    /// Failures surfaced by a strict signer
    pub failures: Vec<SigningFailure>,
    /// Whether the bundle pass ran
    pub bundles_processed: bool,
}

impl SigningReport {
    /// True when nothing failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Classifies build outputs and signs them in dependency order.
#[derive(Clone, Debug)]
pub struct SigningOrchestrator<R> {
    classifier: Classifier,
    signer: Signer<R>,
}

impl<R: CommandRunner> SigningOrchestrator<R> {
    /// Creates an orchestrator from a classifier and a signer.
    pub fn new(classifier: Classifier, signer: Signer<R>) -> Self {
        Self { classifier, signer }
    }

    /// Classifier in use.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Signer in use.
    pub fn signer(&self) -> &Signer<R> {
        &self.signer
    }

    /// Sign every eligible file, then every bundle the files belong to.
    ///
    /// The bundle pass is skipped when the file pass reports failure.
    pub async fn sign_all(&self, files: &[FileRef]) -> SigningReport {
        let mut report = SigningReport::default();

        if !self.sign_eligible_files(files, &mut report).await {
            log::error!(
                "Skipping bundle signing: {} file(s) failed to sign",
                report.failures.len()
            );
            return report;
        }

        report.bundles_processed = true;
        self.sign_bundles(files, &mut report).await;
        report
    }

    /// Run codesign on all eligible files in the given list.
    ///
    /// Ineligible files are ignored. Every eligible file has any existing
    /// signature removed and a new one applied. Returns false only when a
    /// strict signer reported a failure.
    pub async fn sign_eligible_files(&self, files: &[FileRef], report: &mut SigningReport) -> bool {
        let num_files = files.len();
        let mut have_ignored_files = false;
        let mut all_succeeded = true;
        let mut signed_files = Vec::new();

        for (file_index, file) in files.iter().enumerate() {
            if !self.classifier.is_eligible_for_signing(file) {
                log::info!("Ignoring file [{}/{}] {}", file_index + 1, num_files, file);
                report.ignored_files.push(file.clone());
                have_ignored_files = true;
                continue;
            }

            log::info!(
                "Running codesigning routines for file [{}/{}] {}...",
                file_index + 1,
                num_files,
                file
            );

            match self.signer.sign_one(file).await {
                Ok(()) => signed_files.push(file.clone()),
                Err(e) => {
                    log::error!("Failed to sign {}: {}", file, e);
                    report.failures.push(SigningFailure {
                        path: file.relative_path().to_path_buf(),
                        reason: e.to_string(),
                    });
                    all_succeeded = false;
                }
            }
        }

        if have_ignored_files {
            let num_signed_files = signed_files.len();
            log::info!("Signed {} files:", num_signed_files);
            for (file_index, signed_file) in signed_files.iter().enumerate() {
                log::info!("- [{}/{}] {}", file_index + 1, num_signed_files, signed_file);
            }
        }

        report.signed_files.extend(signed_files);
        all_succeeded
    }

    /// Run codesign on every `.app` bundle the given files belong to.
    ///
    /// Bundles are derived from member paths and each one is signed once,
    /// no matter how many of its members appear in the list.
    pub async fn sign_bundles(&self, files: &[FileRef], report: &mut SigningReport) -> bool {
        let mut signed_bundles: HashSet<PathBuf> = HashSet::new();
        let mut all_succeeded = true;

        for file in files {
            if !self.classifier.is_from_bundle(file) {
                continue;
            }

            let bundle = self.classifier.bundle_of(file);
            if signed_bundles.contains(bundle.relative_path()) {
                continue;
            }

            log::info!("Running codesign routines on bundle {}", bundle);

            match self.signer.sign_one(bundle.as_file_ref()).await {
                Ok(()) => report.signed_bundles.push(bundle.clone()),
                Err(e) => {
                    log::error!("Failed to sign bundle {}: {}", bundle, e);
                    report.failures.push(SigningFailure {
                        path: bundle.relative_path().to_path_buf(),
                        reason: e.to_string(),
                    });
                    all_succeeded = false;
                }
            }

            // A failed bundle is not retried for its other members.
            signed_bundles.insert(bundle.relative_path().to_path_buf());
        }

        all_succeeded
    }
}
