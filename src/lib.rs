#![forbid(unsafe_code)]
//! Craven conformance-test harness
//!
//! Runs the Craven interpreter against every fixture under a directory and checks its stdout, stderr, and exit status
//! against the `// UNITTEST` directive embedded in the fixture. See [`craven_directive`] for the directive format.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! A misbehaving interpreter never panics the harness: spawn failures, crashes, timeouts, and undecodable output all
//! become failed verdicts.

pub mod cli;
pub mod config;
pub mod harness;
pub mod version;

pub use config::{ColorChoice, HarnessConfig, OutputFormat};
pub use harness::{FixtureSource, HarnessError, RunSummary, RunTally, Verdict};
