//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation of
//! the inputs shared by every subcommand.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// macOS codesign orchestrator for build outputs
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_codesign",
    version,
    about = "macOS codesign orchestrator for build outputs",
    long_about = "Signs build outputs with codesign: eligible binaries and libraries first, \
then every enclosing .app bundle exactly once.

Usage:
  kodegen_bundler_codesign sign --base-dir ./out --identity \"Developer ID Application: Me (TEAMID)\" \\
      --entitlements entitlements.plist
  kodegen_bundler_codesign sign --base-dir ./out --dry-run Foo.app/Contents/MacOS/Foo
  kodegen_bundler_codesign classify --base-dir ./out

Exit code 0 = every codesign invocation that was checked succeeded."
)]
pub struct Args {
    /// Log every command line and classification decision
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign eligible files, then their bundles
    Sign(SignArgs),

    /// Show how each file would be treated, without signing anything
    Classify(ClassifyArgs),
}

/// Inputs shared by every subcommand
#[derive(ClapArgs, Debug, Clone)]
pub struct InputArgs {
    /// Directory the build step wrote its outputs into
    #[arg(short = 'b', long, value_name = "DIR")]
    pub base_dir: PathBuf,

    /// Output files relative to the base directory (default: every file under it)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// TOML file with a [codesign] table
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments of the `sign` subcommand
#[derive(ClapArgs, Debug, Clone)]
pub struct SignArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Signing identity passed to `codesign --sign`
    #[arg(short, long, value_name = "IDENTITY", env = "MACOS_CODESIGN_IDENTITY")]
    pub identity: Option<String>,

    /// Entitlements plist passed to `codesign --entitlements=`
    #[arg(short, long, value_name = "PATH", env = "MACOS_ENTITLEMENTS_FILE")]
    pub entitlements: Option<PathBuf>,

    /// Fail on codesign errors instead of logging and continuing
    #[arg(long, overrides_with = "no_strict")]
    pub strict: bool,

    /// Log and continue on codesign errors, even if the config file sets `strict`
    #[arg(long, overrides_with = "strict")]
    pub no_strict: bool,

    /// Print the codesign commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments of the `classify` subcommand
#[derive(ClapArgs, Debug, Clone)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let inputs = match &self.command {
            Command::Sign(sign) => &sign.inputs,
            Command::Classify(classify) => &classify.inputs,
        };

        if inputs.base_dir.as_os_str().is_empty() {
            return Err("Base directory cannot be empty".to_string());
        }

        if let Some(file) = inputs.files.iter().find(|f| f.is_absolute()) {
            return Err(format!(
                "Output file {} must be relative to the base directory",
                file.display()
            ));
        }

        Ok(())
    }

    /// Default log filter for this invocation
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
