//! Build output enumeration.

use crate::error::{CliError, CodesignError, Result};
use crate::settings::{CodesignSection, load_config_file};
use crate::signing::FileRef;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::args::InputArgs;

/// Resolve the absolute base directory given on the command line.
pub fn resolve_base_dir(base_dir: &Path) -> Result<PathBuf> {
    Ok(base_dir.absolutize()?.into_owned())
}

/// Load the config file named by `--config`, or defaults when absent.
pub fn load_section(inputs: &InputArgs) -> Result<CodesignSection> {
    match &inputs.config {
        Some(path) => load_config_file(path),
        None => Ok(CodesignSection::default()),
    }
}

/// Build the ordered list of output files.
///
/// Explicit file arguments are used as given. Without any, every regular
/// file under the base directory is listed, sorted by name; symlinks and
/// directories are skipped.
pub fn collect_files(inputs: &InputArgs) -> Result<Vec<FileRef>> {
    let base_dir = resolve_base_dir(&inputs.base_dir)?;

    if !inputs.files.is_empty() {
        return inputs
            .files
            .iter()
            .map(|relative| {
                FileRef::new(base_dir.clone(), relative).map_err(|e| {
                    CodesignError::Cli(CliError::InvalidArguments {
                        reason: e.to_string(),
                    })
                })
            })
            .collect();
    }

    enumerate_dir(&base_dir)
}

/// List every regular file under `base_dir`.
pub fn enumerate_dir(base_dir: &Path) -> Result<Vec<FileRef>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(base_dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| CodesignError::Walk {
            path: base_dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        files.push(FileRef::from_absolute(base_dir, entry.path())?);
    }

    log::debug!("Found {} files under {}", files.len(), base_dir.display());
    Ok(files)
}
