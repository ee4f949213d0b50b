//! Configuration errors that abort a run before any fixture is classified.

use std::io;
use std::path::PathBuf;

use craven_directive::DirectiveError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that make the whole run meaningless.
///
/// Per-fixture problems (spawn failures, crashes, timeouts) are never reported through this type; they become
/// [`crate::harness::Verdict::Failed`] instead.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("fixture root '{}' is missing or unreadable: {source}", path.display())]
    #[diagnostic(code(craven::harness::root))]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("fixture root '{}' is not a directory", path.display())]
    #[diagnostic(code(craven::harness::root))]
    RootNotDirectory { path: PathBuf },

    #[error("invalid fixture pattern '{pattern}': {source}")]
    #[diagnostic(code(craven::harness::pattern), help("patterns use glob syntax, e.g. `*.rvn` or `**/*.rvn`"))]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot read '{}' while discovering fixtures: {source}", path.display())]
    #[diagnostic(code(craven::harness::discovery))]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read fixture '{}': {source}", path.display())]
    #[diagnostic(code(craven::harness::fixture))]
    Fixture {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Directive(#[from] DirectiveError),

    #[error("subject binary '{}' was not found", path.display())]
    #[diagnostic(code(craven::harness::binary), help("build the interpreter first or point --binary at it"))]
    BinaryNotFound { path: PathBuf },

    #[error("subject binary '{}' is not executable", path.display())]
    #[diagnostic(code(craven::harness::binary))]
    BinaryNotExecutable { path: PathBuf },
}
