//! Request body resolution for command line HTTP clients
//!
//! A command line client usually has three ways to describe what it sends:
//! raw bytes piped into the process, shorthand arguments that expand into
//! structured data, or `name value` pairs for a multipart form. This crate
//! holds the policy that picks one of them and the encoders turning each into
//! bytes and, for forms, a `Content-Type` header.
//!
//! # Example
//!
//! ```no_run
//! use http::Request;
//! use micro_body::shorthand::JsonLiteralParser;
//! use micro_body::{BodyResolver, RequestBody};
//!
//! let resolver = BodyResolver::builder().parser(JsonLiteralParser).build().unwrap();
//!
//! let mut request = Request::post("https://example.com/items").body(RequestBody::empty()).unwrap();
//! let args = vec![r#"{"name": "demo"}"#.to_string()];
//! resolver.resolve("application/json", &args, &mut request).unwrap();
//! ```
//!
//! # Resolution order
//!
//! [`BodyResolver::resolve`] checks, in order:
//!
//! 1. **Passthrough**: no arguments and a non interactive stdin, the input is
//!    streamed through unparsed so binary uploads survive
//! 2. **Form**: the media type is `multipart/form-data`, see [`form`]
//! 3. **Structured**: anything else, see [`structured`]
//!
//! Exactly one of them applies per call, and a structured call without any
//! input leaves the request without a body.
//!
//! # Collaborators
//!
//! - [`stdin::InputSource`]: where passthrough bytes come from, the process
//!   stdin by default
//! - [`shorthand::ShorthandParser`]: expands shorthand arguments, the grammar
//!   itself lives outside this crate
//!
//! # Error Handling
//!
//! Every failure surfaces as a [`BodyError`]; the request is only modified once
//! the chosen branch fully succeeded.

mod body;
mod error;
mod resolver;

pub mod form;
pub mod shorthand;
pub mod stdin;
pub mod structured;

mod utils;

pub use body::RequestBody;
pub use error::BodyError;
pub use error::BoxError;
pub use error::BuildError;
pub use error::SerializeError;
pub use resolver::BodyResolver;
pub use resolver::BodyResolverBuilder;
