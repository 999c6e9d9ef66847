//! Decide whether a program's output satisfies an expectation.
//!
//! Two strategies exist:
//! - **Static**: compare against a literal expected output, ignoring surrounding whitespace.
//! - **Checker**: hand `(input, output)` to a pluggable [`Checker`].
//!
//! A checker has three ways to answer. Returning `Ok(true)` accepts, `Ok(false)` rejects without a
//! message, and `Err(CheckError::Assertion(..))` rejects with a diagnostic. `Err(CheckError::Fault(..))`
//! means the checker itself is broken; it is surfaced as [`VerifyError::CheckerFault`] and must never be
//! reported as an ordinary wrong answer.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::failure::WrongAnswer;

/// The verification strategy of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestKind {
    Static,
    Checker,
}

impl TestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::Static => "static",
            TestKind::Checker => "checker",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by a [`Checker`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The output is wrong and the checker explains why.
    #[error("{0}")]
    Assertion(String),
    /// The checker could not do its job (crash, bad protocol, ...).
    #[error("checker fault: {0}")]
    Fault(String),
}

/// A pluggable predicate over `(input, output)`.
///
/// Any `Fn(&str, &str) -> Result<bool, CheckError>` is a checker, which keeps in-process predicates cheap to
/// write. Out-of-process checkers implement this trait themselves.
pub trait Checker: Send + Sync {
    fn check(&self, input: &str, output: &str) -> Result<bool, CheckError>;
}

impl<F> Checker for F
where
    F: Fn(&str, &str) -> Result<bool, CheckError> + Send + Sync,
{
    fn check(&self, input: &str, output: &str) -> Result<bool, CheckError> {
        self(input, output)
    }
}

/// What a test expects from the program.
#[derive(Clone)]
pub enum Expectation {
    Static(String),
    Checker(Arc<dyn Checker>),
}

impl Expectation {
    /// Wrap a checker value.
    pub fn checker(checker: impl Checker + 'static) -> Self {
        Expectation::Checker(Arc::new(checker))
    }

    pub fn kind(&self) -> TestKind {
        match self {
            Expectation::Static(_) => TestKind::Static,
            Expectation::Checker(_) => TestKind::Checker,
        }
    }

    /// Ensure this expectation matches a declared kind.
    ///
    /// ## Errors
    /// - [`KindMismatch`] when a static test is given a checker or a checker test is given a literal.
    pub fn expect_kind(&self, declared: TestKind) -> Result<(), KindMismatch> {
        let found = self.kind();
        if found == declared {
            Ok(())
        } else {
            Err(KindMismatch { declared, found })
        }
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Static(expected) => f.debug_tuple("Static").field(expected).finish(),
            Expectation::Checker(_) => f.write_str("Checker(..)"),
        }
    }
}

/// A test was declared with one kind but given the other kind of expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a {declared} test cannot use a {found} expectation")]
pub struct KindMismatch {
    pub declared: TestKind,
    pub found: TestKind,
}

/// Reasons [`verify`] does not pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error(transparent)]
    WrongAnswer(#[from] WrongAnswer),
    #[error("checker fault: {0}")]
    CheckerFault(String),
}

/// Check `actual` against `expectation` for a test fed with `input`.
///
/// ## Notes
/// - Static comparison trims whitespace on both ends of both sides; everything in between must match
///   byte-for-byte.
/// - The full input/actual/expected values are kept on the resulting [`WrongAnswer`]; shortening only happens
///   when it is displayed.
pub fn verify(input: &str, actual: &str, expectation: &Expectation) -> Result<(), VerifyError> {
    match expectation {
        Expectation::Static(expected) => {
            if actual.trim() == expected.trim() {
                Ok(())
            } else {
                Err(WrongAnswer::new(input, actual).with_expected(expected).into())
            }
        }
        Expectation::Checker(checker) => match checker.check(input, actual) {
            Ok(true) => Ok(()),
            Ok(false) => Err(WrongAnswer::new(input, actual).into()),
            Err(CheckError::Assertion(message)) => Err(WrongAnswer::new(input, actual).with_message(message).into()),
            Err(CheckError::Fault(message)) => Err(VerifyError::CheckerFault(message)),
        },
    }
}
