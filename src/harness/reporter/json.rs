//! Line-delimited JSON event stream
//!
//! Events:
//! - `{"event":"run_started","fixtures":N}`
//! - `{"event":"verdict","name":..,"path":..,"outcome":"passed"|"failed"|"skipped",..}`
//! - `{"event":"run_finished","passed":..,"failed":..,"skipped":..,"duration_ms":..}`

use std::io::{self, Write};

use serde_json::{Value, json};

use super::{FixtureReport, Reporter, RunSummary};
use crate::harness::verdict::{RunTally, Verdict};

pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn on_run_start(&mut self, fixture_count: usize) -> io::Result<()> {
        self.emit(&json!({ "event": "run_started", "fixtures": fixture_count }))
    }

    fn on_fixture_complete(&mut self, report: &FixtureReport, _tally: &RunTally) -> io::Result<()> {
        let mut event = json!({
            "event": "verdict",
            "name": report.name,
            "path": report.path.display().to_string(),
            "duration_ms": report.duration.as_millis() as u64,
        });
        let fields = match &report.verdict {
            Verdict::Passed => json!({ "outcome": "passed" }),
            Verdict::Failed {
                reason,
                expected,
                actual,
            } => json!({
                "outcome": "failed",
                "reason": reason.as_str(),
                "expected": expected,
                "actual": actual,
            }),
            Verdict::Skipped { cause } => json!({ "outcome": "skipped", "cause": cause.as_str() }),
        };
        if let (Some(event), Value::Object(fields)) = (event.as_object_mut(), fields) {
            event.extend(fields);
        }
        self.emit(&event)
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.emit(&json!({
            "event": "run_finished",
            "passed": summary.tally.passed,
            "failed": summary.tally.failed,
            "skipped": summary.tally.skipped,
            "duration_ms": summary.duration.as_millis() as u64,
        }))
    }
}
