//! The test harness: run a program against packs of tests and tally the results.
//!
//! Layers, leaves first:
//! - [`exec`]: one run of the program under an optional time limit.
//! - [`case`]: a single test, i.e. one run plus verification.
//! - [`pack`]: an ordered, named group of tests that can be interrupted.
//! - [`orchestrator`]: every pack in order, then the final summary.

pub mod case;
pub mod exec;
pub mod interrupt;
pub mod orchestrator;
pub mod pack;
pub mod program;
pub mod script;

use thiserror::Error;

pub use case::{Test, TestOutcome};
pub use exec::{ExecError, Execution, execute};
pub use interrupt::{InterruptHandle, Interrupts};
pub use orchestrator::{render_summary, run_packs};
pub use pack::TestPack;
pub use program::Program;
pub use script::ScriptChecker;

/// Errors that end a whole run, as opposed to failing a single test.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("checker for test `{test}` failed: {message}")]
    CheckerFault { test: String, message: String },

    #[error(transparent)]
    Exec(#[from] ExecError),
}
