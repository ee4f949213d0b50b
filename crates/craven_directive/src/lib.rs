//! Embedded test directives for Craven fixtures.
//!
//! A fixture is an ordinary Craven source file. When it carries a `// UNITTEST` marker, the text after the marker is a
//! small `key: value` block describing what the interpreter is expected to do with the file:
//!
//! ```text
//! // UNITTEST
//! // name: integer addition
//! // expected: 4
//! // status: 0
//! ```
//!
//! ## Notes
//! - A missing marker is not an error: [`parse`] returns `Ok(None)` and the harness skips the fixture.
//! - Decoding is pure and only fails for a `status` value that is not an integer.
//!
//! ## Examples
//! ```rust
//! use craven_directive::parse;
//!
//! let spec = parse("print 2 + 2;\n// UNITTEST\n// expected: 4\n", "add.rvn").unwrap().unwrap();
//! assert_eq!(spec.name, "add.rvn");
//! assert_eq!(spec.expected_stdout, "4");
//! assert_eq!(spec.expected_exit_status, None);
//! ```

pub mod error;
pub mod parser;
pub mod spec;

pub use error::DirectiveError;
pub use parser::{MARKER, parse};
pub use spec::{TestSpec, escape, unescape};
