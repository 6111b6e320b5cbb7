//! Input sources the resolver may pass through as a raw request body.
//!
//! The process standard input is the usual source, but the resolver only ever
//! sees it through [`InputSource`], so callers and tests can substitute a
//! [`FixedInput`] without touching a real terminal.

use bytes::{Buf, Bytes};
use std::io::{self, Read};
use tracing::debug;

/// What kind of stream backs the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    /// a character device, usually a terminal: nothing is piped in
    Interactive,
    /// a pipe, a regular file or any other non character device
    Piped,
}

impl StdinMode {
    /// `true` when nothing can be piped through from this source.
    pub fn is_interactive(self) -> bool {
        matches!(self, StdinMode::Interactive)
    }
}

/// A byte source with a queryable mode, standard input by default.
pub trait InputSource {
    /// Queries the mode of the underlying stream, `None` if it can't be determined.
    fn query_mode(&self) -> Option<StdinMode>;

    /// Opens a lazy reader over the remaining bytes of the source.
    fn reader(&self) -> Box<dyn Read + Send>;
}

/// The real process standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessStdin;

impl InputSource for ProcessStdin {
    fn query_mode(&self) -> Option<StdinMode> {
        match stdin_is_char_device() {
            Ok(true) => Some(StdinMode::Interactive),
            Ok(false) => Some(StdinMode::Piped),
            Err(e) => {
                debug!(cause = %e, "failed to stat stdin");
                None
            }
        }
    }

    fn reader(&self) -> Box<dyn Read + Send> {
        Box::new(io::stdin())
    }
}

#[cfg(unix)]
fn stdin_is_char_device() -> io::Result<bool> {
    use std::os::fd::AsFd;

    is_char_device(io::stdin().as_fd())
}

/// fstat on a duplicate of `fd`, no /proc or /dev/fd needed
#[cfg(unix)]
fn is_char_device(fd: std::os::fd::BorrowedFd<'_>) -> io::Result<bool> {
    use std::fs::File;
    use std::os::unix::fs::FileTypeExt;

    let metadata = File::from(fd.try_clone_to_owned()?).metadata()?;
    Ok(metadata.file_type().is_char_device())
}

#[cfg(not(unix))]
fn stdin_is_char_device() -> io::Result<bool> {
    use std::io::IsTerminal;

    Ok(io::stdin().is_terminal())
}

/// An in-memory input source with a fixed mode.
///
/// A `mode` of `None` behaves like a source whose mode query failed.
#[derive(Debug, Clone)]
pub struct FixedInput {
    data: Bytes,
    mode: Option<StdinMode>,
}

impl FixedInput {
    /// An input serving `data` and reporting `mode`.
    pub fn new<B: Into<Bytes>>(data: B, mode: Option<StdinMode>) -> Self {
        Self { data: data.into(), mode }
    }

    /// data piped in from a non interactive source
    pub fn piped<B: Into<Bytes>>(data: B) -> Self {
        Self::new(data, Some(StdinMode::Piped))
    }

    /// an attached terminal with nothing piped in
    pub fn interactive() -> Self {
        Self::new(Bytes::new(), Some(StdinMode::Interactive))
    }

    /// a source whose mode query fails
    pub fn unknown() -> Self {
        Self::new(Bytes::new(), None)
    }
}

impl InputSource for FixedInput {
    fn query_mode(&self) -> Option<StdinMode> {
        self.mode
    }

    fn reader(&self) -> Box<dyn Read + Send> {
        Box::new(self.data.clone().reader())
    }
}
