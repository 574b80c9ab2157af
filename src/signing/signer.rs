//! Remove-then-sign protocol around the `codesign` tool.
//!
//! `codesign` refuses to sign something that already carries a signature,
//! so every file is stripped first and signed second, unconditionally.

use super::error::{Error, Result};
use super::file_ref::FileRef;
use super::runner::{CODESIGN, CommandInvocation, CommandOutput, CommandRunner};
use crate::settings::SigningConfig;
use std::ffi::OsString;

/// What to do when `codesign` fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and carry on as if it succeeded.
    #[default]
    Lenient,
    /// Report sign failures and spawn failures as errors.
    Strict,
}

/// Runs `codesign` against individual files.
#[derive(Clone, Debug)]
pub struct Signer<R> {
    runner: R,
    config: SigningConfig,
    policy: FailurePolicy,
}

impl<R: CommandRunner> Signer<R> {
    /// Creates a lenient signer.
    pub fn new(runner: R, config: SigningConfig) -> Self {
        Self {
            runner,
            config,
            policy: FailurePolicy::default(),
        }
    }

    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Failure policy in effect.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Signing configuration in effect.
    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Runner commands are dispatched to.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Command line that strips any existing signature from `file`.
    pub fn remove_signature_command(&self, file: &FileRef) -> CommandInvocation {
        CommandInvocation::new(CODESIGN)
            .arg("--remove-signature")
            .arg(file.absolute_path())
    }

    /// Command line that signs `file` with the configured identity.
    pub fn sign_command(&self, file: &FileRef) -> CommandInvocation {
        let mut entitlements = OsString::from("--entitlements=");
        entitlements.push(self.config.entitlements_file());

        CommandInvocation::new(CODESIGN)
            .arg("--timestamp")
            .arg("--options")
            .arg("runtime")
            .arg(entitlements)
            .arg("--sign")
            .arg(self.config.signing_identity())
            .arg(file.absolute_path())
    }

    /// Make sure the file carries no signature.
    ///
    /// `codesign` exits non-zero when there is nothing to remove, so a
    /// failed exit is never an error here, under either policy.
    pub async fn remove_signature(&self, file: &FileRef) -> Result<()> {
        log::info!("Removing codesign signature from {}...", file);

        let invocation = self.remove_signature_command(file);
        match self.runner.run(&invocation).await {
            Ok(output) if output.success => Ok(()),
            Ok(output) => {
                log::debug!(
                    "No signature removed from {} ({}): {}",
                    file,
                    output.status_description(),
                    output.stderr
                );
                Ok(())
            }
            Err(e) => self.handle_error(e),
        }
    }

    /// Sign the file. It must not carry a signature already.
    pub async fn sign(&self, file: &FileRef) -> Result<()> {
        log::info!("Codesigning {}...", file);

        let invocation = self.sign_command(file);
        match self.runner.run(&invocation).await {
            Ok(output) if output.success => Ok(()),
            Ok(output) => self.handle_failed_exit(&invocation, output),
            Err(e) => self.handle_error(e),
        }
    }

    /// Remove any existing signature, then sign.
    pub async fn sign_one(&self, file: &FileRef) -> Result<()> {
        self.remove_signature(file).await?;
        self.sign(file).await
    }

    fn handle_failed_exit(&self, invocation: &CommandInvocation, output: CommandOutput) -> Result<()> {
        let error = Error::CommandFailed {
            command: invocation.to_string(),
            status: output.status_description(),
            stderr: output.stderr,
        };
        self.handle_error(error)
    }

    fn handle_error(&self, error: Error) -> Result<()> {
        match self.policy {
            FailurePolicy::Lenient => {
                log::warn!("Ignoring codesign failure: {}", error);
                Ok(())
            }
            FailurePolicy::Strict => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::runner::RecordingRunner;

    fn signer(runner: RecordingRunner) -> Signer<RecordingRunner> {
        Signer::new(
            runner,
            SigningConfig::new("Developer ID Application: Example (TEAMID)", "/etc/app.entitlements"),
        )
    }

    #[tokio::test]
    async fn sign_one_removes_then_signs() {
        let runner = RecordingRunner::new();
        let signer = signer(runner.clone());
        let file = FileRef::new("/out", "lib/libfoo.dylib").unwrap();

        signer.sign_one(&file).await.unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                "codesign --remove-signature /out/lib/libfoo.dylib".to_string(),
                "codesign --timestamp --options runtime --entitlements=/etc/app.entitlements \
                 --sign Developer ID Application: Example (TEAMID) /out/lib/libfoo.dylib"
                    .to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn identity_is_a_single_argument() {
        let runner = RecordingRunner::new();
        let signer = signer(runner.clone());
        let file = FileRef::new("/out", "Foo.app").unwrap();

        signer.sign(&file).await.unwrap();

        let invocations = runner.invocations();
        assert_eq!(
            invocations[0].args_lossy(),
            vec![
                "--timestamp",
                "--options",
                "runtime",
                "--entitlements=/etc/app.entitlements",
                "--sign",
                "Developer ID Application: Example (TEAMID)",
                "/out/Foo.app",
            ]
        );
    }

    #[tokio::test]
    async fn lenient_policy_swallows_sign_failures() {
        let runner = RecordingRunner::new().fail_target("/out/broken.so");
        let signer = signer(runner.clone());
        let file = FileRef::new("/out", "broken.so").unwrap();

        assert!(signer.sign_one(&file).await.is_ok());
        assert_eq!(runner.invocations().len(), 2);
    }

    #[tokio::test]
    async fn strict_policy_reports_sign_failures() {
        let runner = RecordingRunner::new().fail_target("/out/broken.so");
        let signer = signer(runner.clone()).with_policy(FailurePolicy::Strict);
        let file = FileRef::new("/out", "broken.so").unwrap();

        let err = signer.sign_one(&file).await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
        // The failing remove-signature step did not stop the sign attempt.
        assert_eq!(runner.invocations().len(), 2);
    }

    #[tokio::test]
    async fn strict_policy_reports_spawn_failures() {
        let signer = Signer::new(
            SpawnFailingRunner,
            SigningConfig::new("-", "/etc/app.entitlements"),
        )
        .with_policy(FailurePolicy::Strict);
        let file = FileRef::new("/out", "libfoo.dylib").unwrap();

        let err = signer.sign_one(&file).await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    struct SpawnFailingRunner;

    impl CommandRunner for SpawnFailingRunner {
        async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput> {
            Err(Error::Spawn {
                command: invocation.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "codesign missing"),
            })
        }
    }
}
