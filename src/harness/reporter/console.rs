//! Human-readable console output

use std::io::{self, Write};

use super::{FixtureReport, Reporter, RunSummary};
use crate::harness::verdict::{FailureReason, RunTally, SkipCause, Verdict};

/// Return to column 0 and erase the line
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Placeholder for an empty expected/actual value
const NOTHING: &str = "(nothing)";

/// ANSI color codes used by the console reporter. All empty when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub blue: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub const ANSI: Palette = Palette {
        red: "\x1b[31m",
        green: "\x1b[32m",
        yellow: "\x1b[33m",
        blue: "\x1b[34m",
        reset: "\x1b[0m",
    };

    pub const PLAIN: Palette = Palette {
        red: "",
        green: "",
        yellow: "",
        blue: "",
        reset: "",
    };

    pub fn new(color: bool) -> Self {
        if color { Self::ANSI } else { Self::PLAIN }
    }
}

/// Console reporter
///
/// With the live line enabled, a single status line is rewritten in place after every verdict. Failure diffs and the
/// final summary are always permanent output.
pub struct ConsoleReporter<W: Write> {
    out: W,
    palette: Palette,
    live: bool,
    verbose: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            live: false,
            verbose: false,
        }
    }

    /// Rewrite a running tally line after each verdict (only sensible on a terminal)
    pub fn with_live_line(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Also print a line for every passed or skipped fixture
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn tally_line(&self, tally: &RunTally) -> String {
        let Palette {
            red,
            green,
            yellow,
            reset,
            ..
        } = self.palette;
        format!(
            "{green}{}{reset} Passed, {red}{}{reset} Failed, {yellow}{}{reset} Skipped.",
            tally.passed, tally.failed, tally.skipped
        )
    }

    fn failure_block(&self, name: &str, reason: FailureReason, expected: &str, actual: &str) -> String {
        let Palette { red, blue, reset, .. } = self.palette;
        match reason {
            FailureReason::StderrMismatch | FailureReason::StdoutMismatch => {
                let channel = if reason == FailureReason::StderrMismatch {
                    "stderr"
                } else {
                    "stdout"
                };
                format!(
                    "{red}✘ Test '{name}' failed. Expected {channel}:\n{blue}{}{red}\n  Received this instead:\n{blue}{}{reset}\n",
                    indent(expected),
                    indent(actual)
                )
            }
            FailureReason::ExitStatusMismatch => format!(
                "{red}✘ Test '{name}' failed. Expected exit code {blue}{expected}{red} but got {blue}{actual}{red} instead{reset}\n"
            ),
            FailureReason::ExecutionError => {
                format!("{red}✘ Test '{name}' could not be run:\n{blue}{}{reset}\n", indent(actual))
            }
        }
    }

    fn clear_line(&mut self) -> io::Result<()> {
        if self.live {
            self.out.write_all(CLEAR_LINE.as_bytes())?;
        }
        Ok(())
    }

    fn write_live_line(&mut self, tally: &RunTally) -> io::Result<()> {
        if self.live {
            let line = self.tally_line(tally);
            self.out.write_all(line.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_run_start(&mut self, fixture_count: usize) -> io::Result<()> {
        if fixture_count == 0 {
            writeln!(self.out, "No fixtures collected")?;
            return Ok(());
        }
        self.write_live_line(&RunTally::default())
    }

    fn on_fixture_complete(&mut self, report: &FixtureReport, tally: &RunTally) -> io::Result<()> {
        self.clear_line()?;

        let Palette {
            green, yellow, reset, ..
        } = self.palette;
        match &report.verdict {
            Verdict::Failed {
                reason,
                expected,
                actual,
            } => {
                let block = self.failure_block(&report.name, *reason, expected, actual);
                self.out.write_all(block.as_bytes())?;
            }
            Verdict::Passed if self.verbose => {
                writeln!(self.out, "{green}✔ Test '{}' passed{reset}", report.name)?;
            }
            Verdict::Skipped { cause } if self.verbose => {
                let why = match cause {
                    SkipCause::NoDirective => "no directive",
                    SkipCause::Explicit => "skip requested",
                };
                writeln!(self.out, "{yellow}- Test '{}' skipped ({why}){reset}", report.name)?;
            }
            _ => {}
        }

        self.write_live_line(tally)
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.clear_line()?;
        let line = self.tally_line(&summary.tally);
        writeln!(self.out, "{line} ({:.2}s)", summary.duration.as_secs_f64())?;
        self.out.flush()
    }
}

/// Indent every line by four spaces; empty values render as an explicit placeholder.
fn indent(value: &str) -> String {
    if value.is_empty() {
        return format!("    {NOTHING}");
    }
    value
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
