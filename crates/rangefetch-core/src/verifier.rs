//! Range fetch loop and end-to-end digest verification.
//!
//! Asks a [`RangeSource`] for consecutive byte ranges until the target size is
//! reached or the source returns an empty chunk, then hashes what arrived and
//! compares it with the expected digest. Strictly sequential: one request in
//! flight, the accumulation buffer owned by the loop.

use crate::checksum::{self, ExpectedDigest, Verdict};
use crate::fetch::{check_status, FetchError, RangeSource};
use crate::progress::RoundProgress;
use crate::range::ChunkPolicy;
use std::time::Instant;

/// How the fetch loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Target size reached.
    Full,
    /// Source returned an empty chunk before the target was reached.
    EndedEarly,
}

/// Bytes gathered by [`RangeFetchVerifier::fetch`].
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub data: Vec<u8>,
    pub completion: Completion,
    /// Number of non-empty chunks appended.
    pub rounds: usize,
}

/// Result of fetching and verifying.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub total_bytes: u64,
    pub received: u64,
    pub completion: Completion,
    pub rounds: usize,
    /// Lowercase hex SHA-256 of the received bytes.
    pub computed: String,
    /// Expected digest, trimmed and lowercased.
    pub expected: String,
    pub verdict: Verdict,
}

/// Fetches `total_bytes` from a range source in chunks chosen by a
/// [`ChunkPolicy`] and verifies their SHA-256.
pub struct RangeFetchVerifier<S> {
    source: S,
    policy: ChunkPolicy,
}

impl<S: RangeSource> RangeFetchVerifier<S> {
    pub fn new(source: S, policy: ChunkPolicy) -> Self {
        Self { source, policy }
    }

    /// Run the fetch loop. `on_round` is called once per appended chunk.
    ///
    /// Any status other than 200/206 and any transport failure abort the loop;
    /// bytes gathered so far are dropped. An empty chunk ends the loop early
    /// without error.
    pub fn fetch<F>(&mut self, total_bytes: u64, mut on_round: F) -> Result<FetchOutcome, FetchError>
    where
        F: FnMut(&RoundProgress),
    {
        let started = Instant::now();
        let mut data: Vec<u8> = Vec::new();
        let mut offset = 0u64;
        let mut rounds = 0usize;

        let completion = loop {
            let Some(request) = self.policy.next_request(offset, total_bytes) else {
                break Completion::Full;
            };
            tracing::debug!("requesting {}", request.range_header_value());

            let response = self.source.fetch(&request)?;
            check_status(response.status)?;

            let chunk = response.chunk_for(&request, total_bytes - offset);
            if chunk.is_empty() {
                tracing::info!(
                    "empty response at {}/{} bytes; ending fetch early",
                    offset,
                    total_bytes
                );
                break Completion::EndedEarly;
            }

            data.extend_from_slice(chunk);
            offset += chunk.len() as u64;
            rounds += 1;
            debug_assert_eq!(data.len() as u64, offset);

            let progress = RoundProgress {
                request,
                received: chunk.len() as u64,
                bytes_done: offset,
                total_bytes,
                elapsed_secs: started.elapsed().as_secs_f64(),
            };
            tracing::debug!("{} at {:.0} B/s", progress, progress.bytes_per_sec());
            on_round(&progress);
        };

        tracing::info!(
            "fetched {} of {} bytes in {} rounds ({:?})",
            offset,
            total_bytes,
            rounds,
            completion
        );
        Ok(FetchOutcome {
            data,
            completion,
            rounds,
        })
    }

    /// Fetch, then hash the accumulated bytes and compare with `expected`.
    pub fn fetch_and_verify<F>(
        &mut self,
        total_bytes: u64,
        expected: &ExpectedDigest,
        on_round: F,
    ) -> Result<VerificationReport, FetchError>
    where
        F: FnMut(&RoundProgress),
    {
        let outcome = self.fetch(total_bytes, on_round)?;
        let (computed, verdict) = checksum::verify(&outcome.data, expected);
        if !expected.is_well_formed() {
            tracing::warn!(
                "expected digest {:?} is not a 64-character hex SHA-256",
                expected.as_str()
            );
        }
        tracing::info!("sha256 {} ({})", computed, verdict);
        Ok(VerificationReport {
            total_bytes,
            received: outcome.data.len() as u64,
            completion: outcome.completion,
            rounds: outcome.rounds,
            computed,
            expected: expected.as_str().to_string(),
            verdict,
        })
    }
}
