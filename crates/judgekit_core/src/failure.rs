//! Per-test failure taxonomy.
//!
//! Every variant keeps the full captured values. The `Display` impls print a short, human-readable diagnostic
//! and drop any field that is empty or at least [`DISPLAY_LIMIT`] characters long.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Fields this long (in characters) or longer are left out of rendered diagnostics.
pub const DISPLAY_LIMIT: usize = 100;

/// Why a single test did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TestFailure {
    #[error("Time limit ({}s) exceeded.", .limit.as_secs_f64())]
    TimeLimitExceeded { limit: Duration },

    #[error("{}", render_exit(.code, .output))]
    NonZeroExitCode { code: Option<i32>, output: String },

    #[error(transparent)]
    WrongAnswer(#[from] WrongAnswer),
}

impl TestFailure {
    /// Build a non-zero exit failure, trimming the captured output.
    pub fn non_zero_exit(code: Option<i32>, output: &str) -> Self {
        TestFailure::NonZeroExitCode {
            code,
            output: output.trim().to_string(),
        }
    }
}

/// Output did not satisfy the expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongAnswer {
    pub input: String,
    pub actual: String,
    /// Literal expected output, only for static tests.
    pub expected: Option<String>,
    /// Diagnostic raised by a checker.
    pub message: Option<String>,
}

impl WrongAnswer {
    pub fn new(input: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            actual: actual.into(),
            expected: None,
            message: None,
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl std::error::Error for WrongAnswer {}

impl fmt::Display for WrongAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrong answer.")?;
        write_field(f, "Input", &self.input)?;
        if let Some(expected) = &self.expected {
            write_field(f, "Expected output", expected)?;
        }
        write_field(f, "Actual output", &self.actual)?;
        if let Some(message) = &self.message {
            write_field(f, "Checker message", message)?;
        }
        Ok(())
    }
}

/// The trimmed value if it is short enough to show.
pub fn displayable(value: &str) -> Option<&str> {
    let value = value.trim();
    let len = value.chars().count();
    (len > 0 && len < DISPLAY_LIMIT).then_some(value)
}

fn write_field(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    match displayable(value) {
        Some(value) => write!(f, "\n{label}:\n{value}"),
        None => Ok(()),
    }
}

/// `code N` for a normal exit, `a signal` when the process was killed.
pub fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_string(),
    }
}

fn render_exit(code: &Option<i32>, output: &str) -> String {
    let mut out = match code {
        Some(_) => format!("Program exited with non-zero exit {}.", describe_exit(code)),
        None => format!("Program was terminated by {}.", describe_exit(code)),
    };
    if let Some(output) = displayable(output) {
        out.push_str("\nOutput:\n");
        out.push_str(output);
    }
    out
}
