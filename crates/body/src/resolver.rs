use crate::body::RequestBody;
use crate::error::{BodyError, BuildError};
use crate::form::FormEncoder;
use crate::shorthand::{ParseOptions, ShorthandParser};
use crate::stdin::{InputSource, ProcessStdin};
use crate::structured::StructuredInput;
use http::{header, Request};
use std::fmt;
use tracing::debug;

/// Collects the collaborators of a [`BodyResolver`].
pub struct BodyResolverBuilder {
    input: Box<dyn InputSource>,
    parser: Option<Box<dyn ShorthandParser>>,
    options: ParseOptions,
}

impl BodyResolverBuilder {
    fn new() -> Self {
        Self { input: Box::new(ProcessStdin), parser: None, options: ParseOptions::default() }
    }

    /// Replaces the process standard input as the passthrough source.
    pub fn input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Sets the parser expanding shorthand arguments, required.
    pub fn parser(mut self, parser: impl ShorthandParser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Overrides the options handed to the parser on every call.
    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Fails with [`BuildError::MissingParser`] when no parser was set.
    pub fn build(self) -> Result<BodyResolver, BuildError> {
        let parser = self.parser.ok_or(BuildError::MissingParser)?;
        Ok(BodyResolver { input: self.input, parser, options: self.options })
    }
}

impl fmt::Debug for BodyResolverBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyResolverBuilder")
            .field("has_parser", &self.parser.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Decides where an outgoing request body comes from and installs it.
pub struct BodyResolver {
    input: Box<dyn InputSource>,
    parser: Box<dyn ShorthandParser>,
    options: ParseOptions,
}

impl BodyResolver {
    /// Starts a builder reading passthrough bodies from the process stdin.
    pub fn builder() -> BodyResolverBuilder {
        BodyResolverBuilder::new()
    }

    /// Sets the body of `request` from stdin, form pairs or shorthand input.
    ///
    /// In order:
    ///
    /// 1. no `args` and piped stdin: stdin is streamed through untouched
    /// 2. `multipart/form-data`: `args` are `name value` pairs, the body and
    ///    the `Content-Type` header are set
    /// 3. anything else: `args` are shorthand input encoded for `media_type`;
    ///    without any input the request is left untouched
    ///
    /// Nothing on `request` changes when an error is returned.
    pub fn resolve(&self, media_type: &str, args: &[String], request: &mut Request<RequestBody>) -> Result<(), BodyError> {
        if args.is_empty() {
            match self.input.query_mode() {
                Some(mode) if !mode.is_interactive() => {
                    debug!(?mode, "pass stdin through as request body");
                    *request.body_mut() = RequestBody::stream(self.input.reader());
                    return Ok(());
                }
                Some(_) => {}
                None => debug!("unknown stdin mode, fall back to structured input"),
            }
        }

        if media_type == mime::MULTIPART_FORM_DATA.as_ref() {
            let (body, content_type) = FormEncoder.encode(args)?.into_parts();
            debug!(size = body.len(), "set multipart form body");
            *request.body_mut() = RequestBody::once(body);
            request.headers_mut().insert(header::CONTENT_TYPE, content_type);
            return Ok(());
        }

        let structured = StructuredInput::new(&*self.parser, self.options);
        match structured.resolve_encoded(media_type, args)? {
            Some(body) => {
                debug!(media_type, size = body.len(), "set structured body");
                *request.body_mut() = RequestBody::once(body);
            }
            None => debug!("no structured input, leave body empty"),
        }

        Ok(())
    }
}

impl fmt::Debug for BodyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyResolver").field("options", &self.options).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorthand::{MockShorthandParser, Parsed};
    use crate::stdin::FixedInput;
    use http::Method;
    use serde_json::json;
    use std::io::Read;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn request() -> Request<RequestBody> {
        Request::builder().method(Method::GET).uri("https://example.com").body(RequestBody::empty()).unwrap()
    }

    fn read_body(request: &mut Request<RequestBody>) -> String {
        let mut out = String::new();
        request.body_mut().read_to_string(&mut out).unwrap();
        out
    }

    /// parser standing in for the shorthand grammar on `foo: 1, bar: false`
    fn foo_bar_parser() -> MockShorthandParser {
        let mut parser = MockShorthandParser::new();
        parser.expect_parse().returning(|args, _| {
            if args.is_empty() {
                Ok(Parsed::none())
            } else {
                Ok(Parsed::value(json!({"foo": 1, "bar": false})))
            }
        });
        parser
    }

    fn untouched_parser() -> MockShorthandParser {
        let mut parser = MockShorthandParser::new();
        parser.expect_parse().never();
        parser
    }

    fn resolver(input: FixedInput, parser: MockShorthandParser) -> BodyResolver {
        BodyResolver::builder().input(input).parser(parser).build().unwrap()
    }

    #[test]
    fn structured_json() {
        let resolver = resolver(FixedInput::interactive(), foo_bar_parser());
        let mut req = request();

        resolver.resolve("application/json", &args(&["foo: 1, bar: false"]), &mut req).unwrap();

        assert_eq!(read_body(&mut req), r#"{"bar":false,"foo":1}"#);
        assert!(req.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn structured_yaml() {
        let resolver = resolver(FixedInput::interactive(), foo_bar_parser());
        let mut req = request();

        resolver.resolve("application/yaml", &args(&["foo: 1, bar: false"]), &mut req).unwrap();

        assert_eq!(read_body(&mut req), "bar: false\nfoo: 1\n");
    }

    #[test]
    fn structured_ignores_piped_stdin_when_args_given() {
        let resolver = resolver(FixedInput::piped("ignored"), foo_bar_parser());
        let mut req = request();

        resolver.resolve("application/json", &args(&["foo: 1, bar: false"]), &mut req).unwrap();

        assert_eq!(read_body(&mut req), r#"{"bar":false,"foo":1}"#);
    }

    #[test]
    fn binary_stdin_passthrough() {
        for media_type in ["", "application/json", "multipart/form-data", "application/unknown"] {
            let resolver = resolver(FixedInput::piped("This is not JSON!"), untouched_parser());
            let mut req = request();

            resolver.resolve(media_type, &[], &mut req).unwrap();

            assert!(req.body().is_stream());
            assert_eq!(read_body(&mut req), "This is not JSON!");
            assert!(req.headers().is_empty());
        }
    }

    #[test]
    fn raw_bytes_passthrough() {
        let data: &'static [u8] = &[0xff, 0x00, 0xfe, b'\n'];
        let resolver = resolver(FixedInput::piped(data), untouched_parser());
        let mut req = request();

        resolver.resolve("application/octet-stream", &[], &mut req).unwrap();

        let body = std::mem::take(req.body_mut()).into_bytes().unwrap();
        assert_eq!(&body[..], data);
    }

    #[test]
    fn no_input_leaves_body_empty() {
        let resolver = resolver(FixedInput::interactive(), foo_bar_parser());
        let mut req = request();

        resolver.resolve("application/unknown", &[], &mut req).unwrap();

        assert!(req.body().is_empty());
        assert!(!req.body().is_stream());
    }

    #[test]
    fn unknown_stdin_mode_falls_through() {
        let resolver = resolver(FixedInput::unknown(), foo_bar_parser());
        let mut req = request();

        resolver.resolve("application/json", &[], &mut req).unwrap();

        assert!(req.body().is_empty());
        assert!(!req.body().is_stream());
    }

    #[test]
    fn invalid_media_type() {
        let resolver = resolver(FixedInput::interactive(), foo_bar_parser());
        let mut req = request();

        let err = resolver.resolve("application/unknown", &args(&["foo: 1"]), &mut req).unwrap_err();

        assert!(matches!(err, BodyError::UnsupportedMediaType { .. }));
        assert!(req.body().is_empty());
    }

    #[test]
    fn parser_error_is_propagated() {
        let mut parser = MockShorthandParser::new();
        parser.expect_parse().returning(|_, _| Err("bad shorthand".into()));
        let resolver = resolver(FixedInput::interactive(), parser);
        let mut req = request();

        let err = resolver.resolve("application/json", &args(&["foo: ["]), &mut req).unwrap_err();

        assert!(matches!(err, BodyError::Parse { .. }));
        assert!(req.body().is_empty());
    }

    #[test]
    fn custom_parse_options_are_forwarded() {
        let options = ParseOptions { file_input: false, object_detection: true };
        let mut parser = MockShorthandParser::new();
        parser
            .expect_parse()
            .withf(move |_, actual| *actual == options)
            .times(1)
            .returning(|_, _| Ok(Parsed::value(json!([1, 2]))));

        let resolver = BodyResolver::builder().input(FixedInput::interactive()).parser(parser).parse_options(options).build().unwrap();
        let mut req = request();

        resolver.resolve("application/json", &args(&["[1, 2]"]), &mut req).unwrap();
        assert_eq!(read_body(&mut req), "[1,2]");
    }

    #[test]
    fn form_data() {
        let resolver = resolver(FixedInput::piped(""), untouched_parser());
        let mut req = request();

        resolver
            .resolve("multipart/form-data", &args(&["key", "value", "filename", "@testdata/form_file.txt"]), &mut req)
            .unwrap();

        let content_type = req.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let body = read_body(&mut req);
        assert!(body.contains("Content-Disposition: form-data; name=\"key\"\r\n\r\nvalue"));
        assert!(body.contains(concat!(
            "Content-Disposition: form-data; name=\"filename\"; filename=\"testdata/form_file.txt\"\r\n",
            "Content-Type: application/octet-stream\r\n",
            "\r\n",
            "Hello World!"
        )));
    }

    #[test]
    fn form_data_unpaired_arguments() {
        let resolver = resolver(FixedInput::piped(""), untouched_parser());
        let mut req = request();

        let err = resolver.resolve("multipart/form-data", &args(&["key"]), &mut req).unwrap_err();

        assert!(matches!(err, BodyError::UnpairedArguments { count: 1 }));
        assert!(req.body().is_empty());
        assert!(req.headers().is_empty());
    }

    #[test]
    fn resolve_is_idempotent() {
        let resolver = resolver(FixedInput::interactive(), foo_bar_parser());

        for media_type in ["application/json", "application/yaml"] {
            let mut first = request();
            let mut second = request();
            resolver.resolve(media_type, &args(&["foo: 1, bar: false"]), &mut first).unwrap();
            resolver.resolve(media_type, &args(&["foo: 1, bar: false"]), &mut second).unwrap();
            assert_eq!(read_body(&mut first), read_body(&mut second));
        }
    }

    #[test]
    fn build_without_parser() {
        let err = BodyResolver::builder().build().unwrap_err();
        assert!(matches!(err, BuildError::MissingParser));
    }
}
