//! The seam to the shorthand input parser.
//!
//! The shorthand grammar (`foo: 1, bar.baz: [a, b]`, `@file` substitution and
//! friends) lives outside this crate. The resolver only needs something that
//! turns an argument list into a generic [`Value`], which is what
//! [`ShorthandParser`] describes.

use crate::error::BoxError;
use serde_json::Value;

/// Switches handed to the parser on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// allow `@path` substitution of file contents inside the shorthand
    pub file_input: bool,
    /// allow guessing that free-form input describes an object
    pub object_detection: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { file_input: true, object_detection: true }
    }
}

/// Outcome of a successful parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    /// `None` when the arguments carried no input at all
    pub value: Option<Value>,
    pub warnings: Vec<String>,
}

impl Parsed {
    /// Nothing to send.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn value(value: Value) -> Self {
        Self { value: Some(value), warnings: Vec::new() }
    }

    #[must_use]
    pub fn with_warning<S: Into<String>>(mut self, warning: S) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Expands shorthand arguments into a structured value.
#[cfg_attr(test, mockall::automock)]
pub trait ShorthandParser {
    fn parse(&self, args: &[String], options: ParseOptions) -> Result<Parsed, BoxError>;
}

/// Accepts the arguments, joined by spaces, as one plain JSON document.
///
/// No shorthand expansion happens here, so `options` are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLiteralParser;

impl ShorthandParser for JsonLiteralParser {
    fn parse(&self, args: &[String], _options: ParseOptions) -> Result<Parsed, BoxError> {
        let input = args.join(" ");
        if input.trim().is_empty() {
            return Ok(Parsed::none());
        }

        let value = serde_json::from_str::<Value>(&input)?;
        Ok(Parsed::value(value))
    }
}
