//! Verdicts and the running tally

use std::fmt;

/// Why a fixture was not executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipCause {
    /// The fixture has no `// UNITTEST` marker
    NoDirective,
    /// The directive says `skip: yes`
    Explicit,
}

impl SkipCause {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipCause::NoDirective => "no-directive",
            SkipCause::Explicit => "explicit",
        }
    }
}

/// Which check a failed fixture tripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    StderrMismatch,
    StdoutMismatch,
    ExitStatusMismatch,
    /// The interpreter could not be run to completion (spawn failure, signal, timeout, non-UTF-8 output)
    ExecutionError,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::StderrMismatch => "stderr-mismatch",
            FailureReason::StdoutMismatch => "stdout-mismatch",
            FailureReason::ExitStatusMismatch => "exit-status-mismatch",
            FailureReason::ExecutionError => "execution-error",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed {
        reason: FailureReason,
        expected: String,
        actual: String,
    },
    Skipped {
        cause: SkipCause,
    },
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed { .. })
    }
}

/// Pass/fail/skip counters for a run. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunTally {
    pub fn record(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Passed => self.passed += 1,
            Verdict::Failed { .. } => self.failed += 1,
            Verdict::Skipped { .. } => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}
