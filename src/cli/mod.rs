//! Command line interface for kodegen codesign.
//!
//! This module provides the CLI for signing operations, with argument
//! parsing, logging setup, and command dispatch.

mod args;
pub mod commands;
pub mod inputs;

pub use args::{Args, ClassifyArgs, Command, InputArgs, SignArgs};

use crate::error::{CliError, CodesignError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    args.validate().map_err(|reason| {
        CodesignError::Cli(CliError::InvalidArguments { reason })
    })?;

    match &args.command {
        Command::Sign(sign) => commands::sign::execute(sign).await,
        Command::Classify(classify) => commands::classify::execute(classify).await,
    }
}
