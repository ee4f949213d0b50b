//! Fixture harness: discovery, directive decoding, execution, verification, reporting.
//!
//! ## Pipeline
//!
//! ```text
//! FixtureSource ──paths──▶ runner::plan ──Fixture──▶ dispatcher ──▶ workers (≤ jobs)
//!                          (decode directives)          │               │ Executor + verifier
//!                                                       └─ skipped ─────┴──FixtureReport──▶ aggregator ──▶ Reporter
//! ```
//!
//! ## Seams
//!
//! - [`Executor`] abstracts process creation so the pipeline can run against a spy.
//! - [`Reporter`] abstracts output so the console and JSON formats share one driver.

pub mod discovery;
pub mod error;
pub mod executor;
pub mod fixture;
pub mod reporter;
pub mod runner;
pub mod verdict;
pub mod verifier;

pub use discovery::FixtureSource;
pub use error::HarnessError;
pub use executor::{ExecutionError, ExecutionOutcome, Executor, ProcessExecutor, locate_binary};
pub use fixture::Fixture;
pub use reporter::{ConsoleReporter, FixtureReport, JsonReporter, Palette, Reporter, RunSummary};
pub use runner::{plan, run_suite};
pub use verdict::{FailureReason, RunTally, SkipCause, Verdict};
