//! `sign` command: codesign eligible files, then their bundles.

use anyhow::Context;

use crate::cli::args::SignArgs;
use crate::cli::inputs::{collect_files, load_section};
use crate::error::{CliError, CodesignError, Result};
use crate::settings::{CodesignSection, SigningConfig};
use crate::signing::{
    Classifier, CommandRunner, FailurePolicy, FileRef, ProcessRunner, RecordingRunner, Signer,
    SigningOrchestrator, SigningReport,
};

/// Run the `sign` command and return the process exit code.
pub async fn execute(args: &SignArgs) -> Result<i32> {
    let section = load_section(&args.inputs)?;
    let config = signing_config(args, &section)?;
    let policy = failure_policy(args, &section);
    let classifier = Classifier::new(section.rules());
    let files = collect_files(&args.inputs)?;

    log::info!(
        "Signing {} build outputs under {} as {:?}",
        files.len(),
        args.inputs.base_dir.display(),
        config.signing_identity()
    );

    let report = if args.dry_run {
        let runner = RecordingRunner::new();
        let report = sign_with(runner.clone(), config, policy, classifier, &files).await;
        for line in runner.command_lines() {
            println!("{}", line);
        }
        report
    } else {
        let runner = ProcessRunner::detect()
            .context("codesign is required to sign; use --dry-run to preview the commands")?;
        sign_with(runner, config, policy, classifier, &files).await
    };

    print_summary(&report);
    Ok(if report.is_success() { 0 } else { 1 })
}

async fn sign_with<R: CommandRunner>(
    runner: R,
    config: SigningConfig,
    policy: FailurePolicy,
    classifier: Classifier,
    files: &[FileRef],
) -> SigningReport {
    let signer = Signer::new(runner, config).with_policy(policy);
    SigningOrchestrator::new(classifier, signer)
        .sign_all(files)
        .await
}

/// Merge CLI/env values over config file values.
fn signing_config(args: &SignArgs, section: &CodesignSection) -> Result<SigningConfig> {
    let identity = args
        .identity
        .clone()
        .or_else(|| section.identity.clone())
        .ok_or_else(|| {
            CodesignError::Cli(CliError::MissingArgument {
                argument: "--identity (or MACOS_CODESIGN_IDENTITY)".to_string(),
            })
        })?;

    let entitlements = args
        .entitlements
        .clone()
        .or_else(|| section.entitlements.clone())
        .ok_or_else(|| {
            CodesignError::Cli(CliError::MissingArgument {
                argument: "--entitlements (or MACOS_ENTITLEMENTS_FILE)".to_string(),
            })
        })?;

    if identity.trim().is_empty() {
        return Err(CodesignError::Cli(CliError::InvalidArguments {
            reason: "Signing identity cannot be blank".to_string(),
        }));
    }

    if entitlements.as_os_str().is_empty() || entitlements.is_dir() {
        return Err(CodesignError::Cli(CliError::InvalidArguments {
            reason: format!(
                "Entitlements must name a plist file, got {:?}",
                entitlements
            ),
        }));
    }

    Ok(SigningConfig::new(identity, entitlements))
}

/// `--strict` / `--no-strict` override the config file's `strict` key.
fn failure_policy(args: &SignArgs, section: &CodesignSection) -> FailurePolicy {
    let strict = if args.strict {
        true
    } else if args.no_strict {
        false
    } else {
        section.strict.unwrap_or(false)
    };

    if strict {
        FailurePolicy::Strict
    } else {
        FailurePolicy::Lenient
    }
}

fn print_summary(report: &SigningReport) {
    println!(
        "Signed {} files, ignored {}, signed {} bundles",
        report.signed_files.len(),
        report.ignored_files.len(),
        report.signed_bundles.len()
    );

    if !report.bundles_processed {
        println!("Bundle signing skipped");
    }

    for failure in &report.failures {
        println!("FAILED {}: {}", failure.path.display(), failure.reason);
    }
}
