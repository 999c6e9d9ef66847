//! Pack and run aggregation.
//!
//! A pack run produces a [`PackReport`]; the orchestrator collects reports for every non-empty pack into a
//! [`RunSummary`]. Nothing here is mutated behind the caller's back: totals are derived from the reports.

use std::fmt;

/// Round `part / whole` to a whole percentage. An empty `whole` yields `0`.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Result of running one pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    pub name: String,
    /// Number of tests in the pack.
    pub total: usize,
    /// Tests that finished (passed or failed) before the pack ended.
    pub ran: usize,
    pub passed: usize,
}

/// Which of the three pack summaries applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackStatus {
    /// The pack was interrupted before every test ran.
    Incomplete,
    AllPassed,
    Partial { percent: u32 },
}

impl PackReport {
    pub fn new(name: impl Into<String>, total: usize) -> Self {
        Self {
            name: name.into(),
            total,
            ran: 0,
            passed: 0,
        }
    }

    /// Record one finished test.
    pub fn record(&mut self, passed: bool) {
        self.ran += 1;
        if passed {
            self.passed += 1;
        }
    }

    pub fn fully_passed(&self) -> bool {
        self.passed == self.ran
    }

    pub fn status(&self) -> PackStatus {
        if self.ran < self.total {
            PackStatus::Incomplete
        } else if self.passed == self.ran {
            PackStatus::AllPassed
        } else {
            PackStatus::Partial {
                percent: percent(self.passed, self.ran),
            }
        }
    }
}

impl fmt::Display for PackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ran == 0 {
            write!(f, "{} (0/{} tests ran)", self.name, self.total)
        } else {
            write!(
                f,
                "{} ({}/{} - {}% tests passed)",
                self.name,
                self.passed,
                self.ran,
                percent(self.passed, self.ran)
            )
        }
    }
}

/// Totals over every pack that had at least one test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub packs: Vec<PackReport>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: PackReport) {
        self.packs.push(report);
    }

    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    pub fn packs_passed(&self) -> usize {
        self.packs.iter().filter(|p| p.fully_passed()).count()
    }

    pub fn test_count(&self) -> usize {
        self.packs.iter().map(|p| p.ran).sum()
    }

    pub fn tests_passed(&self) -> usize {
        self.packs.iter().map(|p| p.passed).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.packs_passed() == self.pack_count()
    }
}
