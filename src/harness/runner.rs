//! Run orchestration
//!
//! A run has two phases:
//!
//! 1. **Plan** (synchronous): walk the [`FixtureSource`] and decode every directive. Any configuration error aborts
//!    here, before a single verdict exists.
//! 2. **Execute** (async): a dispatcher hands fixtures to a bounded pool of worker tasks. Workers publish
//!    [`FixtureReport`]s over a channel to the aggregator, which alone owns the [`RunTally`] and the [`Reporter`].
//!
//! Fixtures are independent, so verdicts arrive in completion order. With `jobs == 1` at most one interpreter process
//! is alive at a time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use super::discovery::FixtureSource;
use super::error::HarnessError;
use super::executor::Executor;
use super::fixture::Fixture;
use super::reporter::{FixtureReport, Reporter, RunSummary};
use super::verdict::{RunTally, Verdict};
use super::verifier;

/// Discover and decode every fixture.
///
/// ## Errors
/// Returns the first configuration error met: an unreadable entry, an unreadable fixture, or a malformed directive.
#[tracing::instrument(skip_all, fields(root = %source.root().display()))]
pub fn plan(source: &FixtureSource) -> Result<Vec<Fixture>, HarnessError> {
    let fixtures = source
        .iter()?
        .map(|path| Fixture::load(path?))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = fixtures.len(), "planned fixtures");
    Ok(fixtures)
}

/// Classify every fixture, running at most `jobs` interpreters at once.
///
/// Exactly one report per fixture reaches `reporter`, so the final tally always sums to `fixtures.len()`.
pub async fn run_suite<E: Executor>(
    fixtures: Vec<Fixture>,
    executor: Arc<E>,
    reporter: &mut dyn Reporter,
    jobs: usize,
) -> RunSummary {
    let started = Instant::now();
    let mut tally = RunTally::default();

    if let Err(err) = reporter.on_run_start(fixtures.len()) {
        tracing::warn!(%err, "reporter failed to write");
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = tokio::spawn(dispatch(fixtures, executor, jobs.max(1), tx));

    while let Some(report) = rx.recv().await {
        tally.record(&report.verdict);
        if let Err(err) = reporter.on_fixture_complete(&report, &tally) {
            tracing::warn!(%err, "reporter failed to write");
        }
    }
    if let Err(err) = dispatcher.await {
        tracing::error!(%err, "fixture dispatcher stopped unexpectedly");
    }

    let summary = RunSummary {
        tally,
        duration: started.elapsed(),
    };
    if let Err(err) = reporter.on_run_complete(&summary) {
        tracing::warn!(%err, "reporter failed to write");
    }
    summary
}

/// Feed fixtures to workers; skipped fixtures are reported without taking a worker slot.
async fn dispatch<E: Executor>(
    fixtures: Vec<Fixture>,
    executor: Arc<E>,
    jobs: usize,
    tx: mpsc::UnboundedSender<FixtureReport>,
) {
    let slots = Arc::new(Semaphore::new(jobs));
    let mut workers = JoinSet::new();

    for fixture in fixtures {
        if let Err(cause) = verifier::runnable(fixture.spec()) {
            publish(&tx, &fixture, Verdict::Skipped { cause }, Duration::ZERO);
            continue;
        }

        let Ok(permit) = Arc::clone(&slots).acquire_owned().await else {
            // Only reachable if the semaphore is closed, which nothing does
            break;
        };
        let executor = Arc::clone(&executor);
        let tx = tx.clone();
        workers.spawn(async move {
            let started = Instant::now();
            let verdict = verifier::evaluate(executor.as_ref(), &fixture).await;
            drop(permit);
            publish(&tx, &fixture, verdict, started.elapsed());
        });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(err) = joined {
            tracing::error!(%err, "fixture worker panicked");
        }
    }
}

fn publish(tx: &mpsc::UnboundedSender<FixtureReport>, fixture: &Fixture, verdict: Verdict, duration: Duration) {
    let report = FixtureReport {
        path: fixture.path().to_path_buf(),
        name: fixture.name(),
        verdict,
        duration,
    };
    if tx.send(report).is_err() {
        tracing::warn!(fixture = %fixture.path().display(), "aggregator dropped before report was delivered");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::harness::executor::{ExecutionError, ExecutionOutcome};
    use crate::harness::verdict::{FailureReason, SkipCause};

    /// Executor spy: echoes the fixture's file stem on stdout and tracks concurrency.
    #[derive(Default)]
    struct Spy {
        calls: AtomicUsize,
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Executor for Spy {
        async fn execute(&self, fixture: &Path) -> Result<ExecutionOutcome, ExecutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);

            let stem = fixture.file_stem().unwrap().to_string_lossy().into_owned();
            Ok(ExecutionOutcome::new(&stem, "", 0))
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Option<usize>,
        reports: Vec<FixtureReport>,
        summary: Option<RunSummary>,
    }

    impl Reporter for Recorder {
        fn on_run_start(&mut self, fixture_count: usize) -> io::Result<()> {
            self.started = Some(fixture_count);
            Ok(())
        }

        fn on_fixture_complete(&mut self, report: &FixtureReport, tally: &RunTally) -> io::Result<()> {
            assert_eq!(tally.total(), self.reports.len() + 1);
            self.reports.push(report.clone());
            Ok(())
        }

        fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
            self.summary = Some(*summary);
            Ok(())
        }
    }

    fn fixture(stem: &str, source: &str) -> Fixture {
        Fixture::from_source(PathBuf::from(format!("test/unittest/{stem}.rvn")), source).unwrap()
    }

    fn verdict_of<'a>(recorder: &'a Recorder, name: &str) -> &'a Verdict {
        &recorder.reports.iter().find(|r| r.name == name).unwrap().verdict
    }

    #[tokio::test]
    async fn test_mixed_suite() {
        let fixtures = vec![
            fixture("alpha", "// UNITTEST\n// name: alpha\n// expected: alpha\n"),
            fixture("beta", "// UNITTEST\n// name: beta\n// expected: gamma\n"),
            fixture("helper", "fun helper() {}\n"),
            fixture("later", "// UNITTEST\n// name: later\n// skip: yes\n// expected: later\n"),
        ];
        let spy = Arc::new(Spy::default());
        let mut recorder = Recorder::default();

        let summary = run_suite(fixtures, Arc::clone(&spy), &mut recorder, 2).await;

        assert_eq!(recorder.started, Some(4));
        assert_eq!(
            summary.tally,
            RunTally {
                passed: 1,
                failed: 1,
                skipped: 2
            }
        );
        assert_eq!(recorder.summary.unwrap().tally, summary.tally);
        assert_eq!(spy.calls.load(Ordering::SeqCst), 2);

        assert_eq!(verdict_of(&recorder, "alpha"), &Verdict::Passed);
        assert_eq!(
            verdict_of(&recorder, "beta"),
            &Verdict::Failed {
                reason: FailureReason::StdoutMismatch,
                expected: "gamma".into(),
                actual: "beta".into()
            }
        );
        assert_eq!(
            verdict_of(&recorder, "helper.rvn"),
            &Verdict::Skipped {
                cause: SkipCause::NoDirective
            }
        );
        assert_eq!(
            verdict_of(&recorder, "later"),
            &Verdict::Skipped {
                cause: SkipCause::Explicit
            }
        );
    }

    #[tokio::test]
    async fn test_skipped_fixtures_never_spawn() {
        let fixtures = vec![
            fixture("a", "print 1;\n"),
            fixture("b", "// UNITTEST\n// skip: yes\n"),
            fixture("c", "no marker here\n"),
        ];
        let spy = Arc::new(Spy::default());
        let mut recorder = Recorder::default();

        let summary = run_suite(fixtures, Arc::clone(&spy), &mut recorder, 4).await;

        assert_eq!(summary.tally.skipped, 3);
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tally_sums_to_fixture_count() {
        let fixtures: Vec<Fixture> = (0..25)
            .map(|i| match i % 3 {
                0 => fixture(&format!("f{i}"), &format!("// UNITTEST\n// expected: f{i}\n")),
                1 => fixture(&format!("f{i}"), "// UNITTEST\n// expected: wrong\n"),
                _ => fixture(&format!("f{i}"), "plain\n"),
            })
            .collect();
        let count = fixtures.len();
        let mut recorder = Recorder::default();

        let summary = run_suite(fixtures, Arc::new(Spy::default()), &mut recorder, 3).await;

        assert_eq!(summary.tally.total(), count);
        assert_eq!(recorder.reports.len(), count);
        assert_eq!(summary.tally.passed, 9);
        assert_eq!(summary.tally.failed, 8);
        assert_eq!(summary.tally.skipped, 8);
    }

    #[tokio::test]
    async fn test_jobs_bound_concurrency() {
        let fixtures: Vec<Fixture> = (0..12)
            .map(|i| fixture(&format!("f{i}"), &format!("// UNITTEST\n// expected: f{i}\n")))
            .collect();
        let spy = Arc::new(Spy::default());
        let mut recorder = Recorder::default();

        run_suite(fixtures, Arc::clone(&spy), &mut recorder, 3).await;

        assert_eq!(spy.calls.load(Ordering::SeqCst), 12);
        assert!(spy.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_single_job_is_sequential() {
        let fixtures: Vec<Fixture> = (0..5)
            .map(|i| fixture(&format!("f{i}"), &format!("// UNITTEST\n// expected: f{i}\n")))
            .collect();
        let spy = Arc::new(Spy::default());
        let mut recorder = Recorder::default();

        run_suite(fixtures, Arc::clone(&spy), &mut recorder, 1).await;

        assert_eq!(spy.peak.load(Ordering::SeqCst), 1);
        let names: Vec<&str> = recorder.reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["f0.rvn", "f1.rvn", "f2.rvn", "f3.rvn", "f4.rvn"]);
    }

    #[tokio::test]
    async fn test_empty_suite() {
        let mut recorder = Recorder::default();
        let summary = run_suite(Vec::new(), Arc::new(Spy::default()), &mut recorder, 2).await;
        assert_eq!(recorder.started, Some(0));
        assert_eq!(summary.tally.total(), 0);
    }

    #[test]
    fn test_plan_aborts_on_bad_directive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.rvn"), "// UNITTEST\n// expected: 1\n").unwrap();
        std::fs::write(dir.path().join("b.rvn"), "// UNITTEST\n// status: x\n").unwrap();
        let source = FixtureSource::new(dir.path(), "*.rvn").unwrap();
        assert!(matches!(plan(&source), Err(HarnessError::Directive(_))));
    }

    #[test]
    fn test_plan_decodes_in_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.rvn"), "// UNITTEST\n// name: second\n").unwrap();
        std::fs::write(dir.path().join("a.rvn"), "// UNITTEST\n// name: first\n").unwrap();
        std::fs::write(dir.path().join("c.rvn"), "no directive\n").unwrap();
        let source = FixtureSource::new(dir.path(), "*.rvn").unwrap();

        let names: Vec<String> = plan(&source).unwrap().iter().map(Fixture::name).collect();
        assert_eq!(names, vec!["first", "second", "c.rvn"]);
    }
}
