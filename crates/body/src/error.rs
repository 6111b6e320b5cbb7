use http::header::InvalidHeaderValue;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error produced by a [`ShorthandParser`](crate::shorthand::ShorthandParser) implementation.
pub type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("expected a pair number of arguments: {count}")]
    UnpairedArguments { count: usize },

    #[error("unsupported media type for structured body: {media_type}")]
    UnsupportedMediaType { media_type: String },

    #[error("can't read form file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parse shorthand input error: {source}")]
    Parse {
        #[source]
        source: BoxError,
    },

    #[error("serialize body as {media_type} error: {source}")]
    Serialize {
        media_type: String,
        #[source]
        source: SerializeError,
    },

    #[error("invalid content-type header: {source}")]
    InvalidHeader {
        #[from]
        source: InvalidHeaderValue,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl BodyError {
    pub fn unpaired_arguments(count: usize) -> Self {
        Self::UnpairedArguments { count }
    }

    pub fn unsupported_media_type<S: ToString>(media_type: S) -> Self {
        Self::UnsupportedMediaType { media_type: media_type.to_string() }
    }

    pub fn file_access<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::FileAccess { path: path.into(), source }
    }

    pub fn parse<E: Into<BoxError>>(e: E) -> Self {
        Self::Parse { source: e.into() }
    }

    pub fn serialize<S: ToString, E: Into<SerializeError>>(media_type: S, e: E) -> Self {
        Self::Serialize { media_type: media_type.to_string(), source: e.into() }
    }
}

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("json error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("yaml error: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("shorthand parser must be set")]
    MissingParser,
}
