//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use crate::config::{HarnessConfig, OutputFormat};
use crate::harness::{
    self, ConsoleReporter, Fixture, FixtureSource, JsonReporter, Palette, ProcessExecutor, Reporter, SkipCause,
};
use crate::harness::verifier::runnable;

use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Run
// ============================================================================

/// Run every discovered fixture against the interpreter and report verdicts.
///
/// Configuration problems are checked in order (root, pattern, interpreter, directives) and all of them are
/// reported before any fixture runs.
pub fn run_fixtures(config: &HarnessConfig) -> CliResult<ExitCode> {
    let source = FixtureSource::new(&config.root, &config.pattern)?.with_filter(config.filter.clone());
    let binary = harness::locate_binary(&config.binary)?;
    let fixtures = harness::plan(&source)?;
    tracing::info!(count = fixtures.len(), binary = %binary.display(), jobs = config.jobs, "starting run");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting async runtime: {e}")))?;

    let executor = Arc::new(ProcessExecutor::new(binary, config.timeout));
    let mut reporter = reporter_for(config);
    let summary = runtime.block_on(harness::run_suite(fixtures, executor, reporter.as_mut(), config.jobs));

    if summary.tally.failed > 0 {
        // The reporter already explained the failures
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn reporter_for(config: &HarnessConfig) -> Box<dyn Reporter> {
    let stdout = io::stdout();
    let is_terminal = stdout.is_terminal();
    match config.format {
        OutputFormat::Console => Box::new(
            ConsoleReporter::new(stdout.lock(), Palette::new(config.color.enabled(is_terminal)))
                .with_live_line(is_terminal)
                .with_verbose(config.verbose),
        ),
        OutputFormat::Json => Box::new(JsonReporter::new(stdout.lock())),
    }
}

// ============================================================================
// List
// ============================================================================

/// Print the fixtures a run would execute, without touching the interpreter.
pub fn list_fixtures(config: &HarnessConfig) -> CliResult<ExitCode> {
    let source = FixtureSource::new(&config.root, &config.pattern)?.with_filter(config.filter.clone());
    let fixtures = harness::plan(&source)?;

    let mut out = io::stdout().lock();
    write_listing(&mut out, &fixtures, config.verbose)
        .map_err(|e| CliError::failure(format!("Error writing fixture list: {e}")))?;
    Ok(ExitCode::SUCCESS)
}

fn write_listing(out: &mut impl Write, fixtures: &[Fixture], verbose: bool) -> io::Result<()> {
    writeln!(out, "Discovered {} fixture(s):", fixtures.len())?;
    for fixture in fixtures {
        let status = match runnable(fixture.spec()) {
            Ok(_) => "runs",
            Err(SkipCause::NoDirective) => "skipped, no directive",
            Err(SkipCause::Explicit) => "skipped, skip requested",
        };
        writeln!(out, "  - {}: '{}' ({status})", fixture.path().display(), fixture.name())?;

        let Some(spec) = fixture.spec().filter(|_| verbose) else {
            continue;
        };
        for line in spec.to_directive().lines() {
            writeln!(out, "      {line}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn fixture(name: &str, source: &str) -> Fixture {
        Fixture::from_source(PathBuf::from(format!("t/{name}")), source).unwrap()
    }

    #[test]
    fn test_listing() {
        let fixtures = [
            fixture("add.rvn", "print 2 + 2;\n// UNITTEST\n// name: adds\n// expected: 4\n"),
            fixture("lib.rvn", "fun helper() {}\n"),
            fixture("slow.rvn", "// UNITTEST\n// name: slow\n// skip: yes\n"),
        ];

        let mut out = Vec::new();
        write_listing(&mut out, &fixtures, false).unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
Discovered 3 fixture(s):
  - t/add.rvn: 'adds' (runs)
  - t/lib.rvn: 'lib.rvn' (skipped, no directive)
  - t/slow.rvn: 'slow' (skipped, skip requested)
");
    }

    #[test]
    fn test_verbose_listing_shows_directive() {
        let fixtures = [fixture(
            "err.rvn",
            "print x;\n// UNITTEST\n// name: undefined\n// error: Undefined variable 'x'.\n// status: 70\n",
        )];

        let mut out = Vec::new();
        write_listing(&mut out, &fixtures, true).unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
Discovered 1 fixture(s):
  - t/err.rvn: 'undefined' (runs)
      // UNITTEST
      // name: undefined
      // error: Undefined variable 'x'.
      // status: 70
");
    }
}
