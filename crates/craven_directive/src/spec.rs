//! Decoded test expectations.

use crate::parser::MARKER;

/// Expected behavior of the interpreter for one fixture.
///
/// Every field has a documented default, applied when the directive block omits the key:
///
/// | key        | field                  | default                  |
/// |------------|------------------------|--------------------------|
/// | `name`     | `name`                 | the fixture's file name  |
/// | `expected` | `expected_stdout`      | empty                    |
/// | `error`    | `expected_stderr`      | empty                    |
/// | `status`   | `expected_exit_status` | `None` (not checked)     |
/// | `skip`     | `skip`                 | `false`                  |
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestSpec {
    pub name: String,
    pub expected_stdout: String,
    pub expected_stderr: String,
    pub expected_exit_status: Option<i32>,
    pub skip: bool,
}

impl TestSpec {
    /// A spec with all defaults and the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_stdout(mut self, expected: impl Into<String>) -> Self {
        self.expected_stdout = expected.into();
        self
    }

    pub fn with_stderr(mut self, expected: impl Into<String>) -> Self {
        self.expected_stderr = expected.into();
        self
    }

    pub fn with_exit_status(mut self, status: i32) -> Self {
        self.expected_exit_status = Some(status);
        self
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Render this spec as a directive block that [`crate::parse`] decodes back into an equal spec.
    ///
    /// Empty expectations and defaults are omitted; line breaks are written as `\n`.
    pub fn to_directive(&self) -> String {
        let mut block = format!("{MARKER}\n// name: {}\n", escape(&self.name));
        if !self.expected_stdout.is_empty() {
            block.push_str(&format!("// expected: {}\n", escape(&self.expected_stdout)));
        }
        if !self.expected_stderr.is_empty() {
            block.push_str(&format!("// error: {}\n", escape(&self.expected_stderr)));
        }
        if let Some(status) = self.expected_exit_status {
            block.push_str(&format!("// status: {status}\n"));
        }
        if self.skip {
            block.push_str("// skip: yes\n");
        }
        block
    }
}

/// Replace line breaks with the two-character `\n` escape.
pub fn escape(value: &str) -> String {
    value.replace('\n', "\\n")
}

/// Restore line breaks from the two-character `\n` escape.
pub fn unescape(value: &str) -> String {
    value.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_applies_defaults() {
        let spec = TestSpec::named("closures.rvn");
        assert_eq!(spec.name, "closures.rvn");
        assert!(spec.expected_stdout.is_empty());
        assert!(spec.expected_stderr.is_empty());
        assert_eq!(spec.expected_exit_status, None);
        assert!(!spec.skip);
    }

    #[test]
    fn test_escape_and_unescape() {
        assert_eq!(escape("1\n2\n3"), "1\\n2\\n3");
        assert_eq!(unescape("1\\n2\\n3"), "1\n2\n3");
        assert_eq!(unescape("no escapes"), "no escapes");
    }

    #[test]
    fn test_to_directive_omits_defaults() {
        let block = TestSpec::named("plain").to_directive();
        assert_eq!(block, "// UNITTEST\n// name: plain\n");
    }

    #[test]
    fn test_to_directive_writes_every_field() {
        let spec = TestSpec::named("all")
            .with_stdout("a\nb")
            .with_stderr("boom")
            .with_exit_status(70)
            .skipped();
        assert_eq!(
            spec.to_directive(),
            "// UNITTEST\n// name: all\n// expected: a\\nb\n// error: boom\n// status: 70\n// skip: yes\n"
        );
    }
}
