//! HTTP range GET over libcurl, one connection per request.

use super::error::{check_status, FetchError};
use super::parse;
use super::{FetchResponse, RangeSource};
use crate::range::FetchRequest;
use std::str;
use std::time::Duration;

/// Bounded waits for one request. All three are always applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// TCP connect.
    pub connect: Duration,
    /// Abort when no body bytes arrive for this long.
    pub read_stall: Duration,
    /// Hard limit on the whole request.
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            read_stall: Duration::from_secs(30),
            request: Duration::from_secs(300),
        }
    }
}

/// Range source backed by libcurl's easy interface.
#[derive(Debug, Clone)]
pub struct CurlRangeSource {
    endpoint: String,
    timeouts: Timeouts,
}

impl CurlRangeSource {
    pub fn new(endpoint: impl Into<String>, timeouts: Timeouts) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeouts,
        }
    }
}

impl RangeSource for CurlRangeSource {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&self.endpoint)?;
        easy.get(true)?;
        easy.http_version(curl::easy::HttpVersion::V11)?;
        easy.follow_location(false)?;
        easy.forbid_reuse(true)?;
        easy.connect_timeout(self.timeouts.connect)?;
        // Stall detection: fewer than 1 byte/s for `read_stall` aborts the transfer.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.timeouts.read_stall)?;
        easy.timeout(self.timeouts.request)?;
        easy.range(&request.range_spec())?;

        let mut list = curl::easy::List::new();
        list.append("Connection: close")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    // Keep only the last response block (e.g. after 100 Continue).
                    if line.starts_with("HTTP/") {
                        header_lines.clear();
                    }
                    header_lines.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            if let Err(e) = transfer.perform() {
                // Server closed before the declared Content-Length: keep what arrived.
                if !e.is_partial_file() {
                    return Err(FetchError::Transport(e));
                }
            }
        }

        let head = parse::parse_response_head(&header_lines)?;
        check_status(head.status)?;

        let content_length = head
            .content_length
            .as_deref()
            .ok_or(FetchError::MissingContentLength)
            .and_then(parse::parse_content_length)?;

        if head.status == 206 {
            if let Some(value) = head.content_range.as_deref() {
                let range = parse::parse_content_range(value)?;
                if range.start != request.offset {
                    return Err(FetchError::RangeMismatch {
                        requested: request.offset,
                        received: range.start,
                    });
                }
                tracing::debug!(
                    "content-range {}-{} of {}",
                    range.start,
                    range.end,
                    range
                        .total
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "*".to_string())
                );
            }
        }

        let response = FetchResponse {
            status: head.status,
            content_length,
            payload: body,
        };
        if response.is_truncated() {
            tracing::warn!(
                "server closed after {} of {} declared bytes for {}",
                response.payload.len(),
                response.content_length,
                request.range_header_value()
            );
        }
        Ok(response)
    }
}
