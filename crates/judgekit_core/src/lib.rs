//! Provide the IO-free semantics of the judgekit harness: how an expectation is checked, how a failed test is
//! described, and how pack and run results are tallied.
//!
//! This crate is intentionally small and dependency-light. Both the process-running engine and any embedding
//! tool can rely on it to agree on what "passed" means.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, no process handling.
//! - Current scope: test kinds and expectations ([`verify`]), the per-test failure taxonomy with its display
//!   truncation rules ([`failure`]), and pack/run aggregation ([`tally`]).

pub mod failure;
pub mod tally;
pub mod verify;

pub use failure::{DISPLAY_LIMIT, TestFailure, WrongAnswer, describe_exit, displayable};
pub use tally::{PackReport, PackStatus, RunSummary, percent};
pub use verify::{CheckError, Checker, Expectation, KindMismatch, TestKind, VerifyError, verify};
