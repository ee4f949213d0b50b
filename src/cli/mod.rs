//! CLI module for the Craven test harness
//!
//! ## Usage
//!
//! - `craven-unittest` - run `test/unittest/*.rvn` against `build/craven.out`
//! - `craven-unittest tests/ -p '**/*.rvn' -b ./craven -j 8` - custom layout
//! - `craven-unittest --list` - show discovered fixtures without running them
//!
//! ## Exit codes
//!
//! - `0`: every fixture passed or was skipped
//! - `1`: at least one fixture failed
//! - `2`: configuration error (missing root, bad pattern, bad directive, missing interpreter)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::{
    ColorChoice, DEFAULT_BINARY, DEFAULT_PATTERN, DEFAULT_ROOT, DEFAULT_TIMEOUT_SECS, HarnessConfig, OutputFormat,
};
use crate::harness::HarnessError;
use crate::version::HARNESS_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// At least one fixture failed
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The run could not start
    pub const CONFIGURATION: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        // Render through miette so directive errors show the offending fixture line
        let report = miette::Report::new(err);
        Self::new(format!("{report:?}"), ExitCode::CONFIGURATION)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Conformance-test harness for the Craven interpreter
#[derive(Parser, Debug)]
#[command(name = "craven-unittest")]
#[command(version = HARNESS_VERSION)]
#[command(about = "Run Craven fixtures and check them against their // UNITTEST directives", long_about = None)]
pub struct Cli {
    /// Directory containing fixtures
    #[arg(value_name = "ROOT", default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Fixture file pattern, relative to ROOT
    #[arg(short, long, value_name = "GLOB", default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Interpreter under test
    #[arg(short, long, value_name = "PATH", env = "CRAVEN_BIN", default_value = DEFAULT_BINARY)]
    pub binary: PathBuf,

    /// Number of fixtures to run in parallel (default: number of CPUs)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Per-fixture timeout in seconds (0 disables)
    #[arg(short, long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Only run fixtures whose path contains SUBSTR
    #[arg(short = 'k', value_name = "SUBSTR")]
    pub filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Report passed and skipped fixtures too
    #[arg(short, long)]
    pub verbose: bool,

    /// List discovered fixtures and their directives without running them
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Build the harness configuration from parsed arguments.
    pub fn to_config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new()
            .with_root(&self.root)
            .with_pattern(&self.pattern)
            .with_binary(&self.binary)
            .with_timeout(std::time::Duration::from_secs(self.timeout))
            .with_filter(self.filter.clone())
            .with_color(self.color)
            .with_format(self.format)
            .with_verbose(self.verbose);
        if let Some(jobs) = self.jobs {
            config = config.with_jobs(jobs);
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.to_config();
    tracing::debug!(?config, "resolved configuration");

    if cli.list {
        commands::list_fixtures(&config)
    } else {
        commands::run_fixtures(&config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["craven-unittest"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("test/unittest"));
        assert_eq!(cli.pattern, "*.rvn");
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.format, OutputFormat::Console);
        assert_eq!(cli.color, ColorChoice::Auto);
        assert!(!cli.list);
    }

    #[test]
    fn test_cli_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "craven-unittest",
            "fixtures",
            "-p",
            "**/*.rvn",
            "-b",
            "./craven",
            "-j",
            "4",
            "-t",
            "0",
            "-k",
            "closure",
            "--format",
            "json",
            "--color",
            "never",
            "-v",
        ])
        .unwrap();

        let config = cli.to_config();
        assert_eq!(config.root, PathBuf::from("fixtures"));
        assert_eq!(config.pattern, "**/*.rvn");
        assert_eq!(config.binary, PathBuf::from("./craven"));
        assert_eq!(config.jobs, 4);
        assert_eq!(config.timeout, None);
        assert_eq!(config.filter.as_deref(), Some("closure"));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.color, ColorChoice::Never);
        assert!(config.verbose);
    }

    #[test]
    fn test_cli_timeout_seconds() {
        let cli = Cli::try_parse_from(["craven-unittest", "--timeout", "5"]).unwrap();
        assert_eq!(cli.to_config().timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["craven-unittest", "--list"]).unwrap();
        assert!(cli.list);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["craven-unittest", "--format", "tap"]).is_err());
    }

    #[test]
    fn test_harness_error_exit_code() {
        let err = CliError::from(HarnessError::BinaryNotFound {
            path: PathBuf::from("build/craven.out"),
        });
        assert_eq!(err.exit_code, ExitCode::CONFIGURATION);
        assert!(err.message.contains("build/craven.out"));
    }
}
