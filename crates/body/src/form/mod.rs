//! Multipart form bodies built from `name value` argument pairs.
//!
//! A value starting with `@` uploads the file at the rest of the value,
//! anything else is sent as a plain text field.

mod encoder;
mod part;
mod writer;

pub use encoder::FormBody;
pub use encoder::FormEncoder;
pub use part::parse_pairs;
pub use part::FormPart;
pub use part::FILE_MARKER;
pub use writer::MultipartWriter;
