//! Directive block decoder.
//!
//! The block starts right after the first [`MARKER`] in a fixture and runs to the end of the file. Each non-blank line
//! is an entry of the form `<key>: <value>`:
//!
//! - leading comment glyphs on the key (`//`, `#`, `*`) are stripped,
//! - the line is split on its *first* colon, so values may contain colons,
//! - key and value are trimmed, and `\n` in a value becomes a line break.
//!
//! Unknown keys and lines without a colon are ignored so older harnesses keep working with newer fixtures. When a key
//! appears more than once, the last occurrence wins.

use miette::NamedSource;

use crate::error::DirectiveError;
use crate::spec::{TestSpec, unescape};

/// Sentinel that opens a directive block.
pub const MARKER: &str = "// UNITTEST";

/// Decode the directive block embedded in `source`.
///
/// `file_name` becomes the default test name and labels diagnostics.
///
/// ## Errors
/// Returns [`DirectiveError::InvalidStatus`] if a `status` entry is not an integer.
///
/// ## Returns
/// `Ok(None)` when the marker is absent. This is distinct from `Ok(Some(spec))` for an empty block, which yields a
/// `TestSpec` with every default applied.
#[tracing::instrument(skip_all, fields(file = file_name, source_len = source.len()))]
pub fn parse(source: &str, file_name: &str) -> Result<Option<TestSpec>, DirectiveError> {
    let Some(marker_at) = source.find(MARKER) else {
        return Ok(None);
    };

    let mut spec = TestSpec::named(file_name);
    for entry in entries(source, marker_at + MARKER.len()) {
        match entry.key {
            "name" => spec.name = unescape(entry.value),
            "expected" => spec.expected_stdout = unescape(entry.value),
            "error" => spec.expected_stderr = unescape(entry.value),
            "status" => {
                let status = entry
                    .value
                    .parse::<i32>()
                    .map_err(|cause| DirectiveError::InvalidStatus {
                        value: entry.value.to_string(),
                        line: entry.line,
                        src: NamedSource::new(file_name, source.to_string()),
                        span: (entry.value_offset, entry.value.len()).into(),
                        cause,
                    })?;
                spec.expected_exit_status = Some(status);
            }
            "skip" => spec.skip = entry.value == "yes",
            other => tracing::debug!(key = other, line = entry.line, "ignoring unrecognized directive key"),
        }
    }

    Ok(Some(spec))
}

/// One `key: value` line of a directive block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry<'a> {
    key: &'a str,
    value: &'a str,
    /// Byte offset of `value` within the whole source
    value_offset: usize,
    /// 1-based line number within the whole source
    line: usize,
}

/// Iterate the entries of the block that starts at byte `start`.
fn entries(source: &str, start: usize) -> impl Iterator<Item = Entry<'_>> {
    let first_line = source[..start].matches('\n').count() + 1;
    let mut line_offset = start;

    source[start..]
        .split_inclusive('\n')
        .enumerate()
        .filter_map(move |(index, raw)| {
            let offset = line_offset;
            line_offset += raw.len();
            let line = first_line + index;

            let (key, value, value_start) = split_entry(raw)?;
            Some(Entry {
                key,
                value,
                value_offset: offset + value_start,
                line,
            })
        })
}

/// Split a raw line into `(key, value, value_start)`, where `value_start` is relative to the line.
fn split_entry(raw: &str) -> Option<(&str, &str, usize)> {
    if raw.trim().is_empty() {
        return None;
    }
    let Some((head, tail)) = raw.split_once(':') else {
        tracing::trace!(line = raw.trim_end(), "directive line has no colon");
        return None;
    };

    let key = head.trim_start_matches(|c: char| !c.is_alphanumeric()).trim();
    if key.is_empty() {
        return None;
    }

    let leading = tail.len() - tail.trim_start().len();
    let value = tail.trim();
    Some((key, value, head.len() + 1 + leading))
}
