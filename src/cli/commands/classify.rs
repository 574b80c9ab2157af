//! `classify` command: show how each output would be treated.

use crate::cli::args::ClassifyArgs;
use crate::cli::inputs::{collect_files, load_section};
use crate::error::Result;
use crate::signing::{Classifier, FileRef};

/// How the signing passes treat one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Main executable in `Contents/MacOS`
    BundleExecutable,
    /// Signed individually by name or extension
    Eligible,
    /// Not signed on its own
    Ignored,
}

impl Disposition {
    fn label(self) -> &'static str {
        match self {
            Self::BundleExecutable => "executable",
            Self::Eligible => "eligible",
            Self::Ignored => "ignored",
        }
    }
}

/// Classify a single file.
pub fn disposition(classifier: &Classifier, file: &FileRef) -> Disposition {
    if classifier.is_bundle_executable(file) {
        Disposition::BundleExecutable
    } else if classifier.is_eligible_for_signing(file) {
        Disposition::Eligible
    } else {
        Disposition::Ignored
    }
}

/// Render one output line for `file`.
pub fn describe(classifier: &Classifier, file: &FileRef) -> String {
    let label = disposition(classifier, file).label();
    if classifier.is_from_bundle(file) {
        format!(
            "{:<10} {} (bundle {})",
            label,
            file,
            classifier.bundle_of(file)
        )
    } else {
        format!("{:<10} {}", label, file)
    }
}

/// Run the `classify` command and return the process exit code.
pub async fn execute(args: &ClassifyArgs) -> Result<i32> {
    let section = load_section(&args.inputs)?;
    let classifier = Classifier::new(section.rules());
    let files = collect_files(&args.inputs)?;

    for file in &files {
        println!("{}", describe(&classifier, file));
    }

    Ok(0)
}
