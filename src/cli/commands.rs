//! Command implementations for the CLI
//!
//! Each command returns `CliResult<ExitCode>` so errors can be handled at the top level.

use std::env;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use super::{CliError, CliResult, ExitCode};
use crate::fixtures::time_limit::{self, TimeLimitError};
use crate::fixtures::{DirectoryLoader, FixtureError, FixtureLoader};
use crate::harness::{Interrupts, TestPack, render_summary, run_packs};
use crate::report::{ConsoleReporter, Reporter};
use crate::resolve::{DefaultProgramResolver, ProgramResolver, ResolveError};

/// Problems found before any test runs.
#[derive(Debug, Error, Diagnostic)]
pub enum SetupError {
    #[error("program not found: {}", .path.display())]
    #[diagnostic(
        code(judgekit::setup::program_not_found),
        help("pass the path of an executable or of a source file")
    )]
    ProgramNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("test directory not found: {}", .path.display())]
    #[diagnostic(
        code(judgekit::setup::test_dir_not_found),
        help("`--test-dir` must point at an existing directory")
    )]
    TestDirNotFound { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(code(judgekit::setup::resolve))]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    #[diagnostic(
        code(judgekit::setup::fixtures),
        help("check the fixture files in the test directory")
    )]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    #[diagnostic(
        code(judgekit::setup::time_limit),
        help("use a number of seconds such as `1.5`; 0 means unlimited")
    )]
    TimeLimit(#[from] TimeLimitError),
}

/// Everything a run needs, after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Absolute path of the program (or its source).
    pub program: PathBuf,
    pub test_dir: PathBuf,
    pub time_limit: Option<Duration>,
    pub color: bool,
}

impl RunConfig {
    /// Validate command-line arguments.
    ///
    /// ## Parameters
    /// - `test_dir`: defaults to the program's directory.
    /// - `time_limit`: seconds, overriding `TIMELIMIT.txt` in the test directory.
    ///
    /// ## Errors
    /// - [`SetupError::ProgramNotFound`] / [`SetupError::TestDirNotFound`] for missing paths.
    /// - [`SetupError::TimeLimit`] for a negative, NaN or unreadable limit.
    pub fn from_args(
        program: &Path,
        test_dir: Option<&Path>,
        time_limit: Option<f64>,
        color: bool,
    ) -> Result<Self, SetupError> {
        let program = fs::canonicalize(program).map_err(|source| SetupError::ProgramNotFound {
            path: program.to_path_buf(),
            source,
        })?;

        let test_dir = match test_dir {
            Some(dir) if dir.is_dir() => dir.to_path_buf(),
            Some(dir) => {
                return Err(SetupError::TestDirNotFound { path: dir.to_path_buf() });
            }
            None => program
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        let time_limit = time_limit::resolve(time_limit, &test_dir)?;
        tracing::debug!(
            program = %program.display(),
            test_dir = %test_dir.display(),
            time_limit_ms = time_limit.map(|d| d.as_millis() as u64),
            "run configured"
        );

        Ok(Self {
            program,
            test_dir,
            time_limit,
            color,
        })
    }
}

/// Whether console output should be colored.
///
/// Off with `--no-color`, with a non-empty `NO_COLOR`, or when stdout is not a terminal.
pub fn color_enabled(no_color: bool) -> bool {
    !no_color && env::var_os("NO_COLOR").is_none_or(|v| v.is_empty()) && io::stdout().is_terminal()
}

/// Resolve the program and discover its tests.
pub fn prepare(
    config: &RunConfig,
    resolver: &dyn ProgramResolver,
    loader: &dyn FixtureLoader,
    reporter: &mut dyn Reporter,
) -> Result<Vec<TestPack>, SetupError> {
    let program = resolver.resolve(&config.program, reporter)?.into_program();
    let packs = loader.discover(&config.test_dir, Arc::new(program), config.time_limit)?;
    Ok(packs)
}

fn setup_failure(err: SetupError) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(err)))
}

/// Run the `test` command.
pub fn test(program: &Path, test_dir: Option<&Path>, time_limit: Option<f64>, no_color: bool) -> CliResult<ExitCode> {
    let config = RunConfig::from_args(program, test_dir, time_limit, color_enabled(no_color)).map_err(setup_failure)?;
    let mut reporter = ConsoleReporter::stdout(config.color);
    if test_dir.is_none() {
        reporter.info("No test directory provided. Using the parent directory of the program.");
    }

    let packs = prepare(&config, &DefaultProgramResolver, &DirectoryLoader, &mut reporter).map_err(setup_failure)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("failed to start the async runtime: {e}")))?;

    let summary = runtime
        .block_on(async {
            let mut interrupts = Interrupts::listen_ctrl_c();
            run_packs(&packs, &mut reporter, &mut interrupts).await
        })
        .map_err(|e| CliError::failure(format!("error: {e}")))?;

    render_summary(&summary, &mut reporter);
    Ok(ExitCode::SUCCESS)
}
