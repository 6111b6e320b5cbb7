use crate::error::BodyError;
use crate::form::part::{parse_pairs, FormPart};
use crate::form::writer::MultipartWriter;
use bytes::Bytes;
use http::HeaderValue;
use std::fs::File;
use tracing::trace;

/// A finished multipart body together with its `Content-Type`.
#[derive(Debug, Clone)]
pub struct FormBody {
    body: Bytes,
    content_type: HeaderValue,
}

impl FormBody {
    /// The encoded multipart bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// `multipart/form-data; boundary=...`
    pub fn content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    pub fn into_parts(self) -> (Bytes, HeaderValue) {
        (self.body, self.content_type)
    }
}

/// Encodes `name, value` argument pairs into a multipart form body.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormEncoder;

impl FormEncoder {
    /// # Errors
    ///
    /// - [`BodyError::UnpairedArguments`] when `args` has an odd length
    /// - [`BodyError::FileAccess`] when a `@path` file can't be opened or read
    pub fn encode(&self, args: &[String]) -> Result<FormBody, BodyError> {
        let parts = parse_pairs(args)?;

        let mut writer = MultipartWriter::new();
        for part in parts {
            match part {
                FormPart::Field { name, value } => {
                    trace!(name, "append form field");
                    writer.write_field(name, value)?;
                }
                FormPart::File { name, path } => {
                    let mut file = File::open(path).map_err(|e| BodyError::file_access(path, e))?;
                    let size = writer.write_file(name, path, &mut file).map_err(|e| BodyError::file_access(path, e))?;
                    trace!(name, path, size, "append form file");
                }
            }
        }

        let content_type = HeaderValue::try_from(writer.content_type())?;
        let body = writer.finish()?;
        Ok(FormBody { body, content_type })
    }
}
