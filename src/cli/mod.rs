//! CLI module for judgekit
//!
//! ## Commands
//!
//! - `test <program>` - Run a program against the fixtures in a test directory
//!
//! ## Modules
//!
//! - `commands` - Command implementations and run configuration
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.
//!
//! Failing tests never change the exit code. Only a broken setup (missing program, unreadable fixtures, bad time
//! limit) or a broken run (checker fault, program that cannot be started) exits non-zero.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser, Subcommand};

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

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Test stdin/stdout programs against fixture directories
#[derive(Parser, Debug)]
#[command(name = "judgekit")]
#[command(version = VERSION)]
#[command(about = "Test stdin/stdout programs against fixture directories", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a program against its tests
    Test {
        /// Executable or source file (C, C++, Rust, Python, shell)
        #[arg(value_name = "PROGRAM")]
        program: PathBuf,
        /// Directory holding the fixtures (default: the program's directory)
        #[arg(long, value_name = "DIR")]
        test_dir: Option<PathBuf>,
        /// Per-test wall-clock limit in seconds, 0 for none (default: TIMELIMIT.txt, else none)
        #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
        time_limit: Option<f64>,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
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
    match cli.command {
        Some(Command::Test {
            program,
            test_dir,
            time_limit,
            no_color,
        }) => commands::test(&program, test_dir.as_deref(), time_limit, no_color),
        None => {
            // No command - show help
            let _ = Cli::command().print_help();
            Err(CliError::new("", ExitCode::FAILURE))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
