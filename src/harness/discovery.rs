//! Fixture discovery
//!
//! Listing only: nothing here opens or parses a fixture.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::HarnessError;

/// A validated root directory plus the pattern selecting fixtures below it.
///
/// Construction checks the root and the pattern, so every configuration error surfaces before a run starts.
/// [`FixtureSource::iter`] can be called any number of times; each call walks the filesystem afresh.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    root: PathBuf,
    pattern: String,
    filter: Option<String>,
}

impl FixtureSource {
    /// ## Errors
    /// - [`HarnessError::Root`] if `root` cannot be read
    /// - [`HarnessError::RootNotDirectory`] if `root` is a file
    /// - [`HarnessError::Pattern`] if `pattern` is not a valid glob
    #[tracing::instrument(skip_all, fields(root = %root.display(), pattern = pattern))]
    pub fn new(root: &Path, pattern: &str) -> Result<Self, HarnessError> {
        let metadata = fs::metadata(root).map_err(|source| HarnessError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(HarnessError::RootNotDirectory {
                path: root.to_path_buf(),
            });
        }
        // Listing catches roots that exist but deny access
        fs::read_dir(root).map_err(|source| HarnessError::Root {
            path: root.to_path_buf(),
            source,
        })?;

        glob::Pattern::new(pattern).map_err(|source| HarnessError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            pattern: pattern.to_string(),
            filter: None,
        })
    }

    /// Keep only fixtures whose path below the root contains `filter`.
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a new walk over the matching fixture files, in sorted order.
    pub fn iter(&self) -> Result<Fixtures, HarnessError> {
        let full = format!(
            "{}/{}",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            self.pattern
        );
        let paths = glob::glob(&full).map_err(|source| HarnessError::Pattern {
            pattern: self.pattern.clone(),
            source,
        })?;
        Ok(Fixtures {
            paths,
            root: self.root.clone(),
            filter: self.filter.clone(),
        })
    }
}

/// Lazy walk over fixture paths.
pub struct Fixtures {
    paths: glob::Paths,
    root: PathBuf,
    filter: Option<String>,
}

impl Iterator for Fixtures {
    type Item = Result<PathBuf, HarnessError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.paths.next()? {
                Ok(path) => path,
                Err(err) => {
                    let path = err.path().to_path_buf();
                    return Some(Err(HarnessError::Walk {
                        path,
                        source: err.into(),
                    }));
                }
            };
            if !path.is_file() {
                continue;
            }
            if let Some(filter) = &self.filter {
                let relative = path.strip_prefix(&self.root).unwrap_or(&path);
                if !relative.to_string_lossy().contains(filter.as_str()) {
                    continue;
                }
            }
            return Some(Ok(path));
        }
    }
}
