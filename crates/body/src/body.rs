use bytes::{Buf, Bytes};
use std::fmt;
use std::io::{self, Read};

/// Body attached to an outgoing request.
///
/// Either nothing, one in-memory chunk produced by an encoder, or a reader that
/// is drained lazily by whoever sends the request (stdin passthrough).
pub struct RequestBody {
    inner: Kind,
}

enum Kind {
    Once(Option<Bytes>),
    Stream(Box<dyn Read + Send>),
}

impl RequestBody {
    /// A body with no bytes.
    pub fn empty() -> Self {
        Self { inner: Kind::Once(None) }
    }

    /// A body of one in-memory chunk.
    pub fn once(bytes: Bytes) -> Self {
        Self { inner: Kind::Once(Some(bytes)) }
    }

    /// A body read lazily from `reader`.
    pub fn stream<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self { inner: Kind::Stream(Box::new(reader)) }
    }

    /// `true` for an empty in-memory body, never for a stream.
    pub fn is_empty(&self) -> bool {
        match &self.inner {
            Kind::Once(option_bytes) => option_bytes.as_ref().is_none_or(Bytes::is_empty),
            Kind::Stream(_) => false,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.inner, Kind::Stream(_))
    }

    /// Exact remaining length, known only for in-memory bodies.
    pub fn size_hint(&self) -> Option<u64> {
        match &self.inner {
            Kind::Once(None) => Some(0),
            Kind::Once(Some(bytes)) => Some(bytes.len() as u64),
            Kind::Stream(_) => None,
        }
    }

    /// Drains the body into a single buffer.
    pub fn into_bytes(self) -> io::Result<Bytes> {
        match self.inner {
            Kind::Once(option_bytes) => Ok(option_bytes.unwrap_or_default()),
            Kind::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Kind::Once(option_bytes) => f.debug_tuple("Once").field(option_bytes).finish(),
            Kind::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<&'static str> for RequestBody {
    fn from(value: &'static str) -> Self {
        if value.is_empty() {
            Self::empty()
        } else {
            Self::once(Bytes::from_static(value.as_bytes()))
        }
    }
}

impl Read for RequestBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Kind::Once(None) => Ok(0),
            Kind::Once(Some(bytes)) => {
                let n = bytes.remaining().min(buf.len());
                bytes.copy_to_slice(&mut buf[..n]);
                Ok(n)
            }
            Kind::Stream(reader) => reader.read(buf),
        }
    }
}
