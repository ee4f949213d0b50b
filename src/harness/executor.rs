//! Interpreter execution
//!
//! The [`Executor`] trait is the seam between the pipeline and process creation: [`ProcessExecutor`] spawns the real
//! interpreter, while tests substitute spies that count invocations.

use std::env;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use super::error::HarnessError;

/// What the interpreter did with one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Captured stdout, leading and trailing ASCII whitespace removed
    pub stdout: String,
    /// Captured stderr, leading and trailing ASCII whitespace removed
    pub stderr: String,
    pub exit_status: i32,
}

impl ExecutionOutcome {
    /// Build an outcome from raw captured streams, trimming ASCII whitespace from both ends.
    pub fn new(stdout: &str, stderr: &str, exit_status: i32) -> Self {
        Self {
            stdout: trim_ascii_whitespace(stdout).to_string(),
            stderr: trim_ascii_whitespace(stderr).to_string(),
            exit_status,
        }
    }
}

/// Strip space, tab, line feed, vertical tab, form feed and carriage return. Unicode spaces are kept.
fn trim_ascii_whitespace(stream: &str) -> &str {
    stream.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b')
}

/// The interpreter could not be run to completion for one fixture.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to start '{}': {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting for the interpreter: {0}")]
    Wait(#[source] io::Error),

    #[error("timed out after {}s; the interpreter was killed", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("interpreter terminated abnormally ({0})")]
    Terminated(String),

    #[error("interpreter wrote invalid UTF-8 to {stream}")]
    InvalidUtf8 { stream: &'static str },
}

/// Runs the interpreter against a single fixture.
pub trait Executor: Send + Sync + 'static {
    fn execute(&self, fixture: &Path) -> impl Future<Output = Result<ExecutionOutcome, ExecutionError>> + Send;
}

/// Spawns `<binary> <fixture>` as a child process.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(binary: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Executor for ProcessExecutor {
    async fn execute(&self, fixture: &Path) -> Result<ExecutionOutcome, ExecutionError> {
        tracing::debug!(fixture = %fixture.display(), binary = %self.binary.display(), "spawning interpreter");

        let child = Command::new(&self.binary)
            .arg(fixture)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out wait drops the child, which must not outlive the fixture
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ExecutionError::Timeout(limit))?,
            None => child.wait_with_output().await,
        }
        .map_err(ExecutionError::Wait)?;

        let exit_status = output
            .status
            .code()
            .ok_or_else(|| ExecutionError::Terminated(output.status.to_string()))?;
        let stdout = String::from_utf8(output.stdout).map_err(|_| ExecutionError::InvalidUtf8 { stream: "stdout" })?;
        let stderr = String::from_utf8(output.stderr).map_err(|_| ExecutionError::InvalidUtf8 { stream: "stderr" })?;

        Ok(ExecutionOutcome::new(&stdout, &stderr, exit_status))
    }
}

/// Resolve the interpreter before any fixture runs.
///
/// A bare name (`craven`) names a file in the working directory when one exists there, and is looked up on `PATH`
/// otherwise. Anything with a directory component is checked in place. The returned path spawns the same file that
/// was checked.
///
/// ## Errors
/// - [`HarnessError::BinaryNotFound`] if no such file exists
/// - [`HarnessError::BinaryNotExecutable`] if it exists but lacks execute permission
pub fn locate_binary(binary: &Path) -> Result<PathBuf, HarnessError> {
    let is_bare_name = binary.components().count() == 1 && !binary.is_absolute();
    if is_bare_name && !binary.exists() {
        let search = env::var_os("PATH").unwrap_or_default();
        return env::split_paths(&search)
            .map(|dir| dir.join(binary))
            .find(|candidate| candidate.is_file() && is_executable(candidate))
            .ok_or_else(|| HarnessError::BinaryNotFound {
                path: binary.to_path_buf(),
            });
    }

    if !binary.is_file() {
        return Err(HarnessError::BinaryNotFound {
            path: binary.to_path_buf(),
        });
    }
    if !is_executable(binary) {
        return Err(HarnessError::BinaryNotExecutable {
            path: binary.to_path_buf(),
        });
    }
    if is_bare_name {
        // Without a directory component the spawn would search PATH instead of the working directory
        return Ok(Path::new(".").join(binary));
    }
    Ok(binary.to_path_buf())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata().map(|m| m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_trims_streams() {
        let outcome = ExecutionOutcome::new("\n  4\n\n", "\t\n", 0);
        assert_eq!(outcome.stdout, "4");
        assert_eq!(outcome.stderr, "");
    }

    #[test]
    fn test_outcome_trims_only_ascii_whitespace() {
        let outcome = ExecutionOutcome::new("\x0b\x0c 4\r\n", "boom\u{a0}", 0);
        assert_eq!(outcome.stdout, "4");
        assert_eq!(outcome.stderr, "boom\u{a0}");

        let outcome = ExecutionOutcome::new("\u{2000}4\u{2000}", "", 0);
        assert_eq!(outcome.stdout, "\u{2000}4\u{2000}");
    }

    #[test]
    fn test_outcome_keeps_inner_whitespace() {
        let outcome = ExecutionOutcome::new("  1\n\n2  3 \n", "", 0);
        assert_eq!(outcome.stdout, "1\n\n2  3");
    }

    #[test]
    fn test_locate_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_binary(&dir.path().join("craven.out")).unwrap_err();
        assert!(matches!(err, HarnessError::BinaryNotFound { .. }));
    }

    #[test]
    fn test_locate_unknown_bare_name() {
        let err = locate_binary(Path::new("craven-binary-that-does-not-exist")).unwrap_err();
        assert!(matches!(err, HarnessError::BinaryNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_on_path() {
        let found = locate_binary(Path::new("sh")).unwrap();
        assert!(found.is_absolute());
        assert!(found.ends_with("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_non_executable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("craven.out");
        std::fs::write(&path, "not a program").unwrap();
        let err = locate_binary(&path).unwrap_err();
        assert!(matches!(err, HarnessError::BinaryNotExecutable { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_failure_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ProcessExecutor::new(dir.path().join("gone"), None);
        let err = executor.execute(Path::new("fixture.rvn")).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Spawn { .. }));
    }
}
