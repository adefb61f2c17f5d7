//! Range fetch error type and its classification.

use thiserror::Error;

/// Coarse classification used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The server answered, but not in a way we accept.
    Protocol,
    /// Connection failure, reset, or timeout.
    Transport,
}

/// Error returned by a single range request or by the fetch loop.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Status other than 200 or 206.
    #[error("protocol error: unexpected HTTP status {0}")]
    Status(u32),
    /// First response line is not `HTTP/x.y <code> ...`.
    #[error("protocol error: malformed status line {0:?}")]
    MalformedStatusLine(String),
    /// No `Content-Length` in the response headers.
    #[error("protocol error: response has no Content-Length header")]
    MissingContentLength,
    /// A header we rely on could not be parsed.
    #[error("protocol error: malformed {name} header {value:?}")]
    MalformedHeader { name: &'static str, value: String },
    /// `Content-Range` does not start where we asked.
    #[error("protocol error: Content-Range starts at {received}, requested offset {requested}")]
    RangeMismatch { requested: u64, received: u64 },
    /// libcurl reported an error (connect, reset, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] curl::Error),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Transport(_) => ErrorKind::Transport,
            _ => ErrorKind::Protocol,
        }
    }
}

/// Accept 200 (range ignored, full body) and 206 (partial content) only.
pub fn check_status(code: u32) -> Result<(), FetchError> {
    match code {
        200 | 206 => Ok(()),
        other => Err(FetchError::Status(other)),
    }
}
