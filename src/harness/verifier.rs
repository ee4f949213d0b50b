//! Verdict classification
//!
//! Checks run in a fixed order and the first mismatch wins:
//!
//! 1. no directive → skipped, interpreter never started
//! 2. `skip: yes` → skipped, interpreter never started
//! 3. execution error → failed
//! 4. stderr mismatch → failed (so error-path fixtures are diagnosed on the message itself)
//! 5. stdout mismatch → failed
//! 6. exit status mismatch, only when `status` was declared → failed
//! 7. otherwise passed

use craven_directive::TestSpec;

use super::executor::{ExecutionError, ExecutionOutcome, Executor};
use super::fixture::Fixture;
use super::verdict::{FailureReason, SkipCause, Verdict};

/// The directive to execute, or why the fixture must not be executed.
pub fn runnable(spec: Option<&TestSpec>) -> Result<&TestSpec, SkipCause> {
    match spec {
        None => Err(SkipCause::NoDirective),
        Some(spec) if spec.skip => Err(SkipCause::Explicit),
        Some(spec) => Ok(spec),
    }
}

/// Classify one fixture, running the interpreter only when the directive asks for it.
pub async fn evaluate<E: Executor>(executor: &E, fixture: &Fixture) -> Verdict {
    let spec = match runnable(fixture.spec()) {
        Ok(spec) => spec,
        Err(cause) => return Verdict::Skipped { cause },
    };

    let result = executor.execute(fixture.path()).await;
    verify(spec, result)
}

/// Compare an execution result against the decoded expectation.
pub fn verify(spec: &TestSpec, result: Result<ExecutionOutcome, ExecutionError>) -> Verdict {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            return Verdict::Failed {
                reason: FailureReason::ExecutionError,
                expected: String::new(),
                actual: err.to_string(),
            };
        }
    };

    if outcome.stderr != spec.expected_stderr {
        return Verdict::Failed {
            reason: FailureReason::StderrMismatch,
            expected: spec.expected_stderr.clone(),
            actual: outcome.stderr,
        };
    }
    if outcome.stdout != spec.expected_stdout {
        return Verdict::Failed {
            reason: FailureReason::StdoutMismatch,
            expected: spec.expected_stdout.clone(),
            actual: outcome.stdout,
        };
    }
    if let Some(status) = spec.expected_exit_status {
        if status != outcome.exit_status {
            return Verdict::Failed {
                reason: FailureReason::ExitStatusMismatch,
                expected: status.to_string(),
                actual: outcome.exit_status.to_string(),
            };
        }
    }
    Verdict::Passed
}
