//! Resolves a request body the way a command line client would and writes it to stdout.
//!
//! ```text
//! echo 'raw bytes' | micro-body application/octet-stream
//! micro-body application/yaml '{"foo": 1, "bar": false}'
//! micro-body multipart/form-data name demo upload @Cargo.toml
//! ```

use http::{header, Request};
use micro_body::shorthand::JsonLiteralParser;
use micro_body::{BodyResolver, RequestBody};
use std::io;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).with_writer(io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = std::env::args().skip(1);
    let Some(media_type) = args.next() else {
        error!("usage: micro-body <media-type> [args...]");
        return ExitCode::FAILURE;
    };
    let args = args.collect::<Vec<_>>();

    let resolver = match BodyResolver::builder().parser(JsonLiteralParser).build() {
        Ok(resolver) => resolver,
        Err(e) => {
            error!(cause = %e, "build resolver error");
            return ExitCode::FAILURE;
        }
    };

    let mut request = Request::new(RequestBody::empty());
    if let Err(e) = resolver.resolve(&media_type, &args, &mut request) {
        error!(cause = %e, "resolve request body error");
        return ExitCode::FAILURE;
    }

    if let Some(content_type) = request.headers().get(header::CONTENT_TYPE) {
        info!(content_type = ?content_type, "resolved content type");
    }

    match io::copy(request.body_mut(), &mut io::stdout().lock()) {
        Ok(size) => {
            info!(size, "finished writing request body");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(cause = %e, "write request body error");
            ExitCode::FAILURE
        }
    }
}
