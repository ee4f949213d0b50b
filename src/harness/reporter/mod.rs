//! Run reporting
//!
//! The runner feeds every [`FixtureReport`] to a single [`Reporter`] owned by the aggregator, so implementations never
//! see concurrent calls. Two implementations ship:
//!
//! - [`ConsoleReporter`]: live tally line, failure diffs, summary line
//! - [`JsonReporter`]: one JSON event per line for CI tooling

mod console;
mod json;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub use console::{ConsoleReporter, Palette};
pub use json::JsonReporter;

use super::verdict::{RunTally, Verdict};

/// The classification of one fixture, as published by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureReport {
    pub path: PathBuf,
    pub name: String,
    pub verdict: Verdict,
    /// Time spent executing and verifying; zero for skipped fixtures
    pub duration: Duration,
}

/// Final state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub tally: RunTally,
    pub duration: Duration,
}

/// Receives run events in order from the aggregator.
///
/// Implement this trait to customize the output format.
pub trait Reporter {
    /// Called once, after discovery, before any fixture is classified
    fn on_run_start(&mut self, _fixture_count: usize) -> io::Result<()> {
        Ok(())
    }

    /// Called once per fixture; `tally` already includes `report`
    fn on_fixture_complete(&mut self, report: &FixtureReport, tally: &RunTally) -> io::Result<()>;

    /// Called once when every fixture has a verdict
    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()>;
}
