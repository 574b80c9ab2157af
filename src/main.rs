//! Kodegen Bundler Codesign - macOS code signing for build outputs.
//!
//! This binary signs every eligible file in a build output directory with
//! `codesign`, then signs each enclosing `.app` bundle exactly once.

use kodegen_bundler_codesign::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
