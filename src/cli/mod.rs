//! CLI module for the test harness
//!
//! ## Usage
//!
//! - `psptest` - run the default selection (next + good)
//! - `psptest -g` - graphics mode, good set only
//! - `psptest cpu/fpu/fpu ctrl/ctrl` - run the named tests
//! - `psptest --list ignored` - print a classification list
//! - `psptest -- --verbose` - forward flags to the emulator
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use crate::catalog::{self, TestSet};
use crate::config::{EnvOverrides, HarnessConfig};
use crate::harness::{ConsoleReporter, Harness};
use crate::locate::{self, LocateError};
use crate::process::RunError;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<LocateError> for CliError {
    fn from(err: LocateError) -> Self {
        CliError::failure(err.to_string())
    }
}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        CliError::failure(format!("Error: {}", err))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run the pspautotests suite against a headless emulator
#[derive(Parser, Debug)]
#[command(name = "psptest")]
#[command(version = VERSION)]
#[command(about = "Run the pspautotests suite against a headless emulator", long_about = None)]
pub struct Cli {
    /// Tests to run (paths under the test root, without extension)
    #[arg(value_name = "TEST")]
    pub tests: Vec<String>,

    /// Graphics mode: runs only the known-good set by default
    #[arg(short = 'g', long = "graphics")]
    pub graphics: bool,

    /// TeamCity mode (also forwarded to the emulator)
    #[arg(long)]
    pub teamcity: bool,

    /// Per-test timeout in seconds; a batch gets this times its size
    #[arg(long, value_name = "SECS", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Emulator binary (skips discovery)
    #[arg(long, value_name = "PATH")]
    pub emulator: Option<PathBuf>,

    /// Directory containing the compiled tests (skips discovery)
    #[arg(long = "test-root", value_name = "PATH")]
    pub test_root: Option<PathBuf>,

    /// Print a classification list and exit
    #[arg(long, value_name = "SET")]
    pub list: Option<TestSet>,

    /// Flags forwarded to the emulator
    #[arg(last = true, value_name = "EMULATOR_ARGS")]
    pub emulator_args: Vec<String>,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if let Some(set) = cli.list {
        return list_tests(set);
    }

    let config = build_config(&cli, EnvOverrides::from_env(), &locate::search_bases())?;
    let tests = if cli.tests.is_empty() {
        catalog::default_selection(config.graphics)
    } else {
        cli.tests
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting async runtime: {}", e)))?;

    let reporter = ConsoleReporter::new(config.teamcity);
    let mut harness = Harness::new(config, reporter);
    runtime.block_on(harness.run_tests(tests))?;

    // A timed-out batch still ends the harness normally; the emulator's own
    // output is what reports per-test results.
    Ok(ExitCode::SUCCESS)
}

/// Print one classification list, one name per line.
fn list_tests(set: TestSet) -> CliResult<ExitCode> {
    for name in set.names() {
        println!("{}", name);
    }
    Ok(ExitCode::SUCCESS)
}

/// Assemble the configuration: flags beat the environment, and the
/// environment beats discovery.
pub fn build_config(cli: &Cli, env: EnvOverrides, bases: &[PathBuf]) -> CliResult<HarnessConfig> {
    let test_root = match cli.test_root.clone().or(env.test_root) {
        Some(root) => root,
        None => locate::find_test_root(bases)?,
    };
    locate::check_sentinel(&test_root)?;

    let emulator = match cli.emulator.clone().or(env.emulator) {
        Some(path) => locate::check_emulator_override(&path)?,
        None => locate::find_emulator(bases)?,
    };

    Ok(HarnessConfig::new()
        .with_emulator(emulator)
        .with_test_root(test_root)
        .with_test_timeout(Duration::from_secs(cli.timeout))
        .with_teamcity(cli.teamcity)
        .with_graphics(cli.graphics)
        .with_passthrough(cli.emulator_args.iter().cloned()))
}

// ============================================================================
// Tests
// ============================================================================
