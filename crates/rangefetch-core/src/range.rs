//! Range math and chunk planning.
//!
//! Turns "how many bytes so far / how many wanted" into the next HTTP Range
//! request, according to a chunking policy.

/// Default chunk size for [`ChunkPolicy::Fixed`]: 64 KiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 64 * 1024;

/// One range request: `length` bytes starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Bytes already received (start of this request).
    pub offset: u64,
    /// Bytes requested in this call.
    pub length: u64,
}

impl FetchRequest {
    /// End bound sent on the wire: `offset + length`.
    ///
    /// Servers that read the bound as exclusive return `length` bytes; servers
    /// that read it as inclusive return one extra byte, which the fetch loop
    /// discards.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }

    /// HTTP Range header value: `bytes=offset-(offset+length)`.
    pub fn range_header_value(&self) -> String {
        format!("bytes={}-{}", self.offset, self.end())
    }

    /// Range in the form libcurl expects (no `bytes=` unit prefix).
    pub fn range_spec(&self) -> String {
        format!("{}-{}", self.offset, self.end())
    }
}

/// How much to ask for per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkPolicy {
    /// Ask for everything that is still missing in one request.
    Whole,
    /// Ask for at most this many bytes per request.
    Fixed(u64),
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        ChunkPolicy::Fixed(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkPolicy {
    /// Next request given the current offset and the target size, or `None`
    /// once the target is reached.
    pub fn next_request(&self, offset: u64, total_bytes: u64) -> Option<FetchRequest> {
        if offset >= total_bytes {
            return None;
        }
        let remaining = total_bytes - offset;
        let length = match *self {
            ChunkPolicy::Whole => remaining,
            ChunkPolicy::Fixed(size) => remaining.min(size.max(1)),
        };
        Some(FetchRequest { offset, length })
    }
}
