//! Harness configuration
//!
//! Defaults mirror the layout of the Craven repository: fixtures live in `test/unittest/*.rvn` and the interpreter is
//! built to `build/craven.out`.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

pub const DEFAULT_ROOT: &str = "test/unittest";
pub const DEFAULT_PATTERN: &str = "*.rvn";
pub const DEFAULT_BINARY: &str = "build/craven.out";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for one harness run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory searched for fixtures
    pub root: PathBuf,
    /// Glob pattern, relative to `root`, selecting fixture files
    pub pattern: String,
    /// Interpreter under test
    pub binary: PathBuf,
    /// Maximum number of interpreter processes alive at once
    pub jobs: usize,
    /// Per-fixture wall clock limit; `None` waits forever
    pub timeout: Option<Duration>,
    /// Only fixtures whose path contains this substring are discovered
    pub filter: Option<String>,
    pub color: ColorChoice,
    pub format: OutputFormat,
    /// Also report passed and skipped fixtures individually
    pub verbose: bool,
}

/// When to emit ANSI color codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color when writing to a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve the choice against the output stream.
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty()),
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Live tally line plus failure diffs
    #[default]
    Console,
    /// One JSON object per event, one event per line
    Json,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            pattern: DEFAULT_PATTERN.to_string(),
            binary: PathBuf::from(DEFAULT_BINARY),
            jobs: num_cpus::get(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            filter: None,
            color: ColorChoice::Auto,
            format: OutputFormat::Console,
            verbose: false,
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the worker count (at least one worker always runs)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Set the per-fixture timeout; a zero duration disables it
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
