//! External command execution.
//!
//! Signing goes through the [`CommandRunner`] capability so the same code
//! path can either spawn the real `codesign` tool ([`ProcessRunner`]) or
//! record what would have been run ([`RecordingRunner`]).

use super::error::{Error, Result};
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Name of the macOS signing tool.
pub const CODESIGN: &str = "codesign";

/// A single external command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInvocation {
    program: String,
    args: Vec<OsString>,
}

impl CommandInvocation {
    /// Starts an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Logical program name, e.g. `codesign`.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments converted lossily to UTF-8, for logging and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Last argument; for codesign this is always the target path.
    pub fn target(&self) -> Option<&Path> {
        self.args.last().map(Path::new)
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Outcome of a finished command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited successfully
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// A successful, silent exit.
    pub fn success() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// An unsuccessful exit with the given code and stderr.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.into(),
        }
    }

    /// Human readable exit status.
    pub fn status_description(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Capability to run an external command to completion.
///
/// `Err` means the command could not be run at all; a command that ran and
/// failed is an `Ok` with an unsuccessful [`CommandOutput`].
pub trait CommandRunner {
    /// Runs the command and waits for it to exit.
    fn run(
        &self,
        invocation: &CommandInvocation,
    ) -> impl Future<Output = Result<CommandOutput>> + Send;
}

/// Runs commands as real child processes.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    program: PathBuf,
}

impl ProcessRunner {
    /// Locate `codesign` on PATH.
    pub fn detect() -> Result<Self> {
        match which::which(CODESIGN) {
            Ok(path) => {
                log::debug!("Found {} at: {}", CODESIGN, path.display());
                Ok(Self { program: path })
            }
            Err(source) => Err(Error::ToolNotFound {
                tool: CODESIGN.to_string(),
                source,
            }),
        }
    }

    /// Use an explicit executable instead of searching PATH.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable every invocation is dispatched to.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput> {
        log::debug!("Executing: {}", invocation);

        let output = tokio::process::Command::new(&self.program)
            .args(invocation.args())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                command: invocation.to_string(),
                source,
            })?;

        Ok(output.into())
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    invocations: Vec<CommandInvocation>,
    failing_targets: HashSet<PathBuf>,
}

/// Records invocations instead of running them.
///
/// Clones share the same log, so a test can keep one handle while the
/// signer owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingRunner {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingRunner {
    /// Creates a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every command targeting `path` exit with code 1.
    pub fn fail_target(self, path: impl Into<PathBuf>) -> Self {
        self.lock().failing_targets.insert(path.into());
        self
    }

    /// Invocations recorded so far, in order.
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.lock().invocations.clone()
    }

    /// Recorded invocations rendered as command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.lock()
            .invocations
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput> {
        log::info!("Mock: {}", invocation);

        let mut state = self.lock();
        state.invocations.push(invocation.clone());

        let fails = invocation
            .target()
            .is_some_and(|target| state.failing_targets.contains(target));

        if fails {
            Ok(CommandOutput::failure(1, format!("{}: mocked failure", CODESIGN)))
        } else {
            Ok(CommandOutput::success())
        }
    }
}
