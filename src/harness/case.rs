//! A single test case and its run protocol.

use std::sync::Arc;
use std::time::Duration;

use judgekit_core::{Expectation, KindMismatch, TestFailure, TestKind, VerifyError, verify};

use super::RunError;
use super::exec::{ExecError, execute};
use super::program::Program;
use crate::report::Reporter;

/// One stdin payload checked against one expectation.
///
/// Tests are immutable once built; running one does not change it.
#[derive(Debug, Clone)]
pub struct Test {
    program: Arc<Program>,
    name: String,
    kind: TestKind,
    stdin: String,
    expectation: Expectation,
    time_limit: Option<Duration>,
}

/// Terminal state of a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed { elapsed: Duration },
    Failed(TestFailure),
}

impl TestOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed { .. })
    }
}

impl Test {
    /// Build a test, checking that `expectation` agrees with `kind`.
    ///
    /// ## Errors
    /// - [`KindMismatch`] when a static test gets a checker or a checker test gets a literal.
    pub fn new(
        program: Arc<Program>,
        name: impl Into<String>,
        kind: TestKind,
        stdin: impl Into<String>,
        expectation: Expectation,
        time_limit: Option<Duration>,
    ) -> Result<Self, KindMismatch> {
        expectation.expect_kind(kind)?;
        Ok(Self {
            program,
            name: name.into(),
            kind,
            stdin: stdin.into(),
            expectation,
            time_limit,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TestKind {
        self.kind
    }

    pub fn stdin(&self) -> &str {
        &self.stdin
    }

    pub fn expectation(&self) -> &Expectation {
        &self.expectation
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Execute the program and verify its output.
    ///
    /// Emits exactly one `success` or `failure` event. Per-test problems (time limit, exit code, wrong answer)
    /// come back as [`TestOutcome::Failed`].
    ///
    /// ## Errors
    /// - [`RunError::CheckerFault`] when the checker itself breaks.
    /// - [`RunError::Exec`] when the program cannot be started.
    pub async fn run(&self, reporter: &mut dyn Reporter) -> Result<TestOutcome, RunError> {
        let execution = match execute(&self.program, &self.stdin, self.time_limit).await {
            Ok(execution) => execution,
            Err(ExecError::Failed(failure)) => return Ok(self.fail(failure, reporter)),
            Err(e) => return Err(RunError::Exec(e)),
        };

        if self.kind == TestKind::Checker {
            reporter.progress("Checking...");
        }

        match verify(&self.stdin, &execution.output, &self.expectation) {
            Ok(()) => {
                reporter.success(&format!("Passed ({:.3}s)!", execution.elapsed.as_secs_f64()));
                Ok(TestOutcome::Passed {
                    elapsed: execution.elapsed,
                })
            }
            Err(VerifyError::WrongAnswer(wa)) => Ok(self.fail(wa.into(), reporter)),
            Err(VerifyError::CheckerFault(message)) => {
                reporter.failure(&format!("Checker failed: {message}"));
                Err(RunError::CheckerFault {
                    test: self.name.clone(),
                    message,
                })
            }
        }
    }

    fn fail(&self, failure: TestFailure, reporter: &mut dyn Reporter) -> TestOutcome {
        reporter.failure(&failure.to_string());
        TestOutcome::Failed(failure)
    }
}
