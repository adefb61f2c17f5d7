pub mod config;
pub mod logging;

pub mod checksum;
pub mod fetch;
pub mod progress;
pub mod range;
pub mod verifier;

pub use checksum::{ExpectedDigest, Verdict};
pub use fetch::{CurlRangeSource, FetchError, FetchResponse, RangeSource, Timeouts};
pub use range::{ChunkPolicy, FetchRequest};
pub use verifier::{Completion, RangeFetchVerifier, VerificationReport};
