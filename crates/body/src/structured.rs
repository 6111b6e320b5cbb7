//! Structured input: shorthand arguments turned into a JSON or YAML body.
//!
//! Object keys are always written in lexicographic order, whatever map the
//! parser produced, so the same arguments give byte-identical bodies.

use crate::error::BodyError;
use crate::shorthand::{ParseOptions, ShorthandParser};
use bytes::Bytes;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::ser::Formatter;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use tracing::{trace, warn};

/// Serialization formats a structured body can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredFormat {
    Json,
    Yaml,
}

impl StructuredFormat {
    /// Picks a format by looking for `json` or `yaml` anywhere in the media type.
    pub fn detect(media_type: &str) -> Option<Self> {
        if media_type.contains("json") {
            Some(Self::Json)
        } else if media_type.contains("yaml") {
            Some(Self::Yaml)
        } else {
            None
        }
    }
}

/// Shorthand arguments parsed into a structured value.
pub struct StructuredInput<'a> {
    parser: &'a dyn ShorthandParser,
    options: ParseOptions,
}

impl<'a> StructuredInput<'a> {
    /// Parses with `parser`, passing `options` on every call.
    pub fn new(parser: &'a dyn ShorthandParser, options: ParseOptions) -> Self {
        Self { parser, options }
    }

    /// Runs the shorthand parser over `args`.
    ///
    /// `Ok(None)` means there is nothing to send, which is not an error.
    pub fn resolve(&self, args: &[String]) -> Result<Option<Value>, BodyError> {
        let parsed = self.parser.parse(args, self.options).map_err(BodyError::parse)?;
        for warning in &parsed.warnings {
            warn!(warning = %warning, "shorthand input warning");
        }
        Ok(parsed.value)
    }

    /// Resolves `args` and encodes the result for `media_type`.
    pub fn resolve_encoded(&self, media_type: &str, args: &[String]) -> Result<Option<Bytes>, BodyError> {
        match self.resolve(args)? {
            Some(value) => encode(media_type, &value).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for StructuredInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredInput").field("options", &self.options).finish_non_exhaustive()
    }
}

/// Encodes `value` as compact JSON or block YAML depending on `media_type`.
///
/// # Errors
///
/// [`BodyError::UnsupportedMediaType`] if the media type mentions neither
/// `json` nor `yaml`, [`BodyError::Serialize`] if the encoder fails.
pub fn encode(media_type: &str, value: &Value) -> Result<Bytes, BodyError> {
    let format = StructuredFormat::detect(media_type).ok_or_else(|| BodyError::unsupported_media_type(media_type))?;

    let sorted = Sorted(value);
    let bytes = match format {
        StructuredFormat::Json => to_json(&sorted).map_err(|e| BodyError::serialize(media_type, e))?,
        StructuredFormat::Yaml => serde_yaml::to_string(&sorted).map_err(|e| BodyError::serialize(media_type, e))?.into_bytes(),
    };

    trace!(?format, size = bytes.len(), "encoded structured body");
    Ok(Bytes::from(bytes))
}

/// Compact JSON with `<`, `>`, `&`, U+2028 and U+2029 written as `\uXXXX`.
fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, HtmlSafeFormatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Default compact output, with html sensitive characters escaped in strings.
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serializes a [`Value`] with object keys in sorted order.
struct Sorted<'a>(&'a Value);

impl Serialize for Sorted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Sorted(item))?;
                }
                seq.end()
            }
            Value::Object(object) => {
                let sorted = object.iter().collect::<BTreeMap<_, _>>();
                let mut map = serializer.serialize_map(Some(sorted.len()))?;
                for (key, value) in sorted {
                    map.serialize_entry(key, &Sorted(value))?;
                }
                map.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}
