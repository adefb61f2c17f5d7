//! Per-round progress reporting (bytes this round, cumulative, rate).
//!
//! The fetch loop hands one `RoundProgress` to its caller after every chunk
//! it appends; the CLI prints its `Display` form as the progress line.

use crate::range::FetchRequest;
use std::fmt;

/// Snapshot after one chunk was appended.
#[derive(Debug, Clone)]
pub struct RoundProgress {
    /// Range that was requested this round.
    pub request: FetchRequest,
    /// Bytes appended this round.
    pub received: u64,
    /// Bytes accumulated so far (current offset).
    pub bytes_done: u64,
    /// Target size in bytes.
    pub total_bytes: u64,
    /// Elapsed time since the first request (seconds).
    pub elapsed_secs: f64,
}

impl RoundProgress {
    /// Average rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}

impl fmt::Display for RoundProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "range {}: got {} bytes, {}/{} bytes ({:.1}%)",
            self.request.range_header_value(),
            self.received,
            self.bytes_done,
            self.total_bytes,
            self.fraction() * 100.0
        )
    }
}
