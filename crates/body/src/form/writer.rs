//! A minimal `multipart/form-data` writer backed by a [`BytesMut`].
//!
//! Parts are laid out as
//!
//! ```text
//! --{boundary}\r\n
//! Content-Disposition: form-data; name="{name}"\r\n
//! \r\n
//! {value}
//! \r\n--{boundary}\r\n
//! Content-Disposition: form-data; name="{name}"; filename="{filename}"\r\n
//! Content-Type: application/octet-stream\r\n
//! \r\n
//! {file bytes}
//! \r\n--{boundary}--\r\n
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use std::io::{self, Read, Write};

/// Initial buffer size allocated for the form body
const INIT_BODY_SIZE: usize = 4 * 1024;

/// Random bytes in a generated boundary, hex encoded on the wire
const BOUNDARY_BYTES: usize = 30;

/// Appends multipart parts into one in-memory body.
#[derive(Debug)]
pub struct MultipartWriter {
    buf: BytesMut,
    boundary: String,
    has_parts: bool,
}

impl MultipartWriter {
    /// Creates a writer with a freshly generated random boundary.
    pub fn new() -> Self {
        Self::with_boundary(random_boundary())
    }

    /// Creates a writer using `boundary` as given.
    pub fn with_boundary<S: Into<String>>(boundary: S) -> Self {
        Self { buf: BytesMut::with_capacity(INIT_BODY_SIZE), boundary: boundary.into(), has_parts: false }
    }

    /// The boundary separating parts.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value matching this writer's boundary.
    pub fn content_type(&self) -> String {
        format!("{}; boundary={}", mime::MULTIPART_FORM_DATA, self.boundary)
    }

    /// Appends a plain field part.
    pub fn write_field(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.write_part_header(name, None)?;
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    /// Appends a file part, streaming `reader` to its end.
    ///
    /// Returns the number of bytes copied.
    pub fn write_file<R: Read + ?Sized>(&mut self, name: &str, filename: &str, reader: &mut R) -> io::Result<u64> {
        self.write_part_header(name, Some(filename))?;
        io::copy(reader, &mut FastWrite(&mut self.buf))
    }

    /// Writes the closing boundary and hands back the whole body.
    pub fn finish(mut self) -> io::Result<Bytes> {
        if self.has_parts {
            self.buf.put_slice(b"\r\n");
        }
        write!(FastWrite(&mut self.buf), "--{}--\r\n", self.boundary)?;
        Ok(self.buf.freeze())
    }

    fn write_part_header(&mut self, name: &str, filename: Option<&str>) -> io::Result<()> {
        let mut w = FastWrite(&mut self.buf);
        if self.has_parts {
            w.write_all(b"\r\n")?;
        }
        write!(w, "--{}\r\n", self.boundary)?;
        write!(w, "Content-Disposition: form-data; name=\"{}\"", escape_quotes(name))?;
        match filename {
            Some(filename) => {
                write!(w, "; filename=\"{}\"\r\n", escape_quotes(filename))?;
                write!(w, "Content-Type: {}\r\n", mime::APPLICATION_OCTET_STREAM)?;
            }
            None => w.write_all(b"\r\n")?,
        }
        w.write_all(b"\r\n")?;
        self.has_parts = true;
        Ok(())
    }
}

impl Default for MultipartWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn random_boundary() -> String {
    std::iter::repeat_with(|| format!("{:02x}", fastrand::u8(..))).take(BOUNDARY_BYTES).collect()
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Writer appending straight into the body buffer.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn crlf(s: &str) -> String {
        s.replace('\n', "\r\n")
    }

    #[test]
    fn random_boundaries() {
        let a = MultipartWriter::new();
        let b = MultipartWriter::new();

        assert_eq!(a.boundary().len(), BOUNDARY_BYTES * 2);
        assert!(a.boundary().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.boundary(), b.boundary());
        assert_eq!(a.content_type(), format!("multipart/form-data; boundary={}", a.boundary()));
    }

    #[test]
    fn write_parts() {
        let mut writer = MultipartWriter::with_boundary("XYZ");
        writer.write_field("key", "value").unwrap();
        let copied = writer.write_file("upload", "dir/a.txt", &mut &b"Hello World!"[..]).unwrap();
        assert_eq!(copied, 12);

        let body = writer.finish().unwrap();

        let expected = crlf(indoc! {r#"
            --XYZ
            Content-Disposition: form-data; name="key"

            value
            --XYZ
            Content-Disposition: form-data; name="upload"; filename="dir/a.txt"
            Content-Type: application/octet-stream

            Hello World!
            --XYZ--
        "#});
        assert_eq!(std::str::from_utf8(&body).unwrap(), expected);
    }

    #[test]
    fn empty_form() {
        let body = MultipartWriter::with_boundary("XYZ").finish().unwrap();
        assert_eq!(&body[..], b"--XYZ--\r\n");
    }

    #[test]
    fn quotes_are_escaped() {
        let mut writer = MultipartWriter::with_boundary("XYZ");
        writer.write_field(r#"we"ird\name"#, "v").unwrap();
        let body = writer.finish().unwrap();

        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains(r#"Content-Disposition: form-data; name="we\"ird\\name""#));
    }

    #[test]
    fn failed_copy_is_reported() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }

        let mut writer = MultipartWriter::with_boundary("XYZ");
        let err = writer.write_file("upload", "a.bin", &mut Broken).unwrap_err();
        assert_eq!(err.to_string(), "disk on fire");
    }
}
