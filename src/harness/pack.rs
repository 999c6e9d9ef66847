//! Named, ordered groups of tests.

use judgekit_core::{PackReport, PackStatus};

use super::RunError;
use super::case::Test;
use super::interrupt::Interrupts;
use crate::report::{ICON_POINTER, Reporter};

/// A named group of tests, run in insertion order.
#[derive(Debug, Clone)]
pub struct TestPack {
    name: String,
    tests: Vec<Test>,
}

impl TestPack {
    pub fn new(name: impl Into<String>, tests: Vec<Test>) -> Self {
        Self {
            name: name.into(),
            tests,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Append `test`, or replace the test of the same name where it stands.
    ///
    /// ## Returns
    /// The replaced test, if any.
    pub fn upsert(&mut self, test: Test) -> Option<Test> {
        match self.tests.iter_mut().find(|t| t.name() == test.name()) {
            Some(slot) => Some(std::mem::replace(slot, test)),
            None => {
                self.tests.push(test);
                None
            }
        }
    }

    /// Run every test in order and summarize the pack.
    ///
    /// Each test is raced against `interrupts`; an interrupt drops the test in flight (killing its child), leaves
    /// it uncounted and ends the pack early. An interrupt that lands while a test is being checked ends the pack
    /// once that test is counted. Interrupts delivered before the pack starts are discarded. Exactly one summary
    /// event is emitted at the end.
    ///
    /// ## Errors
    /// - Any [`RunError`] from a test aborts the pack immediately, without a summary.
    #[tracing::instrument(skip_all, fields(pack = %self.name, tests = self.tests.len()))]
    pub async fn run(&self, reporter: &mut dyn Reporter, interrupts: &mut Interrupts) -> Result<PackReport, RunError> {
        let total = self.tests.len();
        let mut report = PackReport::new(self.name.clone(), total);
        interrupts.clear();

        for (i, test) in self.tests.iter().enumerate() {
            reporter.progress(&format!(
                "{ICON_POINTER} [{}: {}/{}] Running {} test {}...",
                self.name,
                i + 1,
                total,
                test.kind(),
                test.name()
            ));

            let step = tokio::select! {
                biased;
                _ = interrupts.next() => None,
                outcome = test.run(reporter) => Some(outcome),
            };
            let Some(outcome) = step else {
                tracing::debug!(test = test.name(), "pack interrupted");
                reporter.warning("Interrupted!");
                break;
            };
            report.record(outcome?.is_passed());

            // Checkers block the runtime, so an interrupt raised meanwhile is only seen here.
            if interrupts.take_pending() && i + 1 < total {
                tracing::debug!(test = test.name(), "pack interrupted after a test");
                reporter.warning("Interrupted!");
                break;
            }
        }

        summarize(&report, reporter);
        Ok(report)
    }
}

fn summarize(report: &PackReport, reporter: &mut dyn Reporter) {
    let name = &report.name;
    match report.status() {
        PackStatus::Incomplete => reporter.warning(&format!(
            "[{name}] Ran only {} out of {} tests ({} passed).",
            report.ran, report.total, report.passed
        )),
        PackStatus::AllPassed => reporter.success(&format!("[{name}] All tests passed!")),
        PackStatus::Partial { percent } => reporter.failure(&format!(
            "[{name}] Passed {} out of {} tests ({percent}%).",
            report.passed, report.ran
        )),
    }
}
