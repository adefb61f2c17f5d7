//! Byte-range sources.
//!
//! The fetch loop talks to a [`RangeSource`]; [`CurlRangeSource`] is the HTTP
//! implementation (one libcurl `Easy` handle and one connection per request).

mod curl_source;
mod error;
mod parse;

pub use curl_source::{CurlRangeSource, Timeouts};
pub use error::{check_status, ErrorKind, FetchError};

use crate::range::FetchRequest;

/// One response to a range request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u32,
    /// Declared body length.
    pub content_length: u64,
    /// Body bytes actually read; may be shorter than `content_length` when the
    /// server closed early.
    pub payload: Vec<u8>,
}

impl FetchResponse {
    /// Bytes of this response that belong at `request.offset`.
    ///
    /// A 206 body is clamped to `request.length`. A 200 body starts at byte 0
    /// of the resource, so the first `request.offset` bytes are skipped and up
    /// to `remaining` bytes are kept.
    pub fn chunk_for(&self, request: &FetchRequest, remaining: u64) -> &[u8] {
        let (body, limit) = if self.status == 200 {
            let skip = usize::try_from(request.offset).unwrap_or(usize::MAX);
            (self.payload.get(skip..).unwrap_or(&[]), remaining)
        } else {
            (&self.payload[..], request.length.min(remaining))
        };
        let take = usize::try_from(limit).unwrap_or(usize::MAX).min(body.len());
        &body[..take]
    }

    /// True when fewer body bytes arrived than were declared.
    pub fn is_truncated(&self) -> bool {
        (self.payload.len() as u64) < self.content_length
    }
}

/// Something that answers range requests.
pub trait RangeSource {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}

impl<S: RangeSource + ?Sized> RangeSource for &mut S {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        (**self).fetch(request)
    }
}
