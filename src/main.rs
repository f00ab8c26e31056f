//! ica - analyze a single iMessage conversation.
//!
//! Resolves contacts from the AddressBook, extracts the matching thread from
//! chat.db, runs one analyzer, and prints or exports its table.
//!
//! CHANGELOG:
//! - 10/18/2026 - Replaced command set with analyzer dispatch; symlink invocation
//! - 01/10/2026 - Initial scaffold with CLI skeleton

use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use ica::cli::{self, Invocation};
use ica::config::SourcePaths;

/// Exit status after Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

fn run() -> Result<()> {
    let argv: Vec<std::ffi::OsString> = std::env::args_os().collect();
    let program = argv.first().map(PathBuf::from).unwrap_or_default();
    let invocation = Invocation::detect(&program);

    let parsed = match cli::parse(&invocation, argv)? {
        Ok(parsed) => parsed,
        // Prints help/version or the usage error and exits
        Err(e) => e.exit(),
    };

    let paths = SourcePaths::discover();
    cli::run(&paths, &parsed)?;
    Ok(())
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = ctrlc::set_handler(|| std::process::exit(INTERRUPTED_EXIT_CODE)) {
        warn!("could not install Ctrl-C handler: {}", e);
    }

    match run() {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
