#![forbid(unsafe_code)]
//! judgekit: run stdin/stdout programs against fixture directories.
//!
//! A program (an executable or a source file that gets compiled or interpreted) is run once per test, fed the
//! test's input on stdin, optionally bounded by a wall-clock limit, and judged either against a literal expected
//! output or by a checker. Tests are grouped in packs and reported pack by pack.
//!
//! ## Layout
//!
//! - [`harness`]: execution engine, tests, packs and the run orchestrator.
//! - [`fixtures`]: discovery of tests from a directory.
//! - [`resolve`]: turning a source file into a runnable program.
//! - [`report`]: the reporting boundary and its console implementation.
//! - [`cli`]: the `judgekit` command.
//!
//! The IO-free rules (what counts as a pass, how failures are described, how results are tallied) live in the
//! `judgekit_core` crate and are re-exported here.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod fixtures;
pub mod harness;
pub mod report;
pub mod resolve;

pub use judgekit_core::{
    CheckError, Checker, Expectation, KindMismatch, PackReport, RunSummary, TestFailure, TestKind, WrongAnswer,
};

pub use fixtures::{DirectoryLoader, FixtureError, FixtureLoader};
pub use harness::{Interrupts, Program, RunError, Test, TestOutcome, TestPack, render_summary, run_packs};
pub use report::{ConsoleReporter, Event, RecordingReporter, Reporter};
pub use resolve::{DefaultProgramResolver, ProgramResolver, Resolution, ResolveError};
