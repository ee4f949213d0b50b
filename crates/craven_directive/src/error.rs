//! Directive decoding errors.

use std::num::ParseIntError;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A directive block that cannot be decoded.
///
/// Only recognized keys with malformed values end up here; unknown keys and stray lines are ignored.
#[derive(Debug, Error, Diagnostic)]
pub enum DirectiveError {
    #[error("invalid exit status `{value}` on line {line}")]
    #[diagnostic(
        code(craven::directive::invalid_status),
        help("`status` takes an integer exit code, e.g. `// status: 65`")
    )]
    InvalidStatus {
        value: String,
        /// 1-based line number in the fixture
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("not an integer")]
        span: SourceSpan,
        #[source]
        cause: ParseIntError,
    },
}

impl DirectiveError {
    /// 1-based line number of the offending directive entry.
    pub fn line(&self) -> usize {
        match self {
            DirectiveError::InvalidStatus { line, .. } => *line,
        }
    }
}
