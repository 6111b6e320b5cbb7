use crate::error::BodyError;
use crate::utils::ensure;

/// Marks a form value as a reference to a file to upload.
pub const FILE_MARKER: char = '@';

/// One name/value pair of a multipart form, decided once from the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPart<'a> {
    Field { name: &'a str, value: &'a str },
    /// `path` is kept exactly as given and doubles as the part's filename
    File { name: &'a str, path: &'a str },
}

impl<'a> FormPart<'a> {
    /// A value of `@path` becomes a file part, anything else a literal field.
    ///
    /// A lone `@` has no path behind it and stays a literal field.
    pub fn from_pair(name: &'a str, value: &'a str) -> Self {
        match value.strip_prefix(FILE_MARKER) {
            Some(path) if !path.is_empty() => FormPart::File { name, path },
            _ => FormPart::Field { name, value },
        }
    }

    /// The form field name of either variant.
    pub fn name(&self) -> &'a str {
        match *self {
            FormPart::Field { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Splits an alternating `name, value, name, value...` list into parts.
pub fn parse_pairs(args: &[String]) -> Result<Vec<FormPart<'_>>, BodyError> {
    ensure!(args.len() % 2 == 0, BodyError::unpaired_arguments(args.len()));

    Ok(args.chunks_exact(2).map(|pair| FormPart::from_pair(&pair[0], &pair[1])).collect())
}
