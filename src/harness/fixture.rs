//! Fixture files and their decoded directives

use std::fs;
use std::path::{Path, PathBuf};

use craven_directive::{DirectiveError, TestSpec};

use super::error::HarnessError;

/// A discovered fixture with its directive decoded.
///
/// The source text is only held long enough to decode the directive; the interpreter reads the file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    path: PathBuf,
    /// `None` when the file has no `// UNITTEST` marker
    spec: Option<TestSpec>,
}

impl Fixture {
    /// Read `path` and decode its directive.
    ///
    /// ## Errors
    /// - [`HarnessError::Fixture`] if the file cannot be read as UTF-8 text
    /// - [`HarnessError::Directive`] if the directive block is malformed
    pub fn load(path: PathBuf) -> Result<Self, HarnessError> {
        let source = fs::read_to_string(&path).map_err(|source| HarnessError::Fixture {
            path: path.clone(),
            source,
        })?;
        Ok(Self::from_source(path, &source)?)
    }

    /// Decode the directive from already-read source text.
    pub fn from_source(path: PathBuf, source: &str) -> Result<Self, DirectiveError> {
        let spec = craven_directive::parse(source, &file_name(&path))?;
        Ok(Self { path, spec })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn spec(&self) -> Option<&TestSpec> {
        self.spec.as_ref()
    }

    /// Display name: the directive's `name`, or the file name when there is no directive.
    pub fn name(&self) -> String {
        match &self.spec {
            Some(spec) => spec.name.clone(),
            None => file_name(&self.path),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
