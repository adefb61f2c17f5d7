//! Parse HTTP response header lines collected from libcurl.

use super::error::FetchError;

/// Status and the raw header values the range source needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub status: u32,
    pub content_length: Option<String>,
    pub content_range: Option<String>,
}

/// Parsed `Content-Range: bytes start-end/total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ContentRange {
    pub start: u64,
    /// Inclusive.
    pub end: u64,
    /// `None` when the server sent `*`.
    pub total: Option<u64>,
}

/// Parse `HTTP/1.1 206 Partial Content` into the status code.
pub(crate) fn parse_status_line(line: &str) -> Result<u32, FetchError> {
    let malformed = || FetchError::MalformedStatusLine(line.to_string());
    let mut parts = line.split_whitespace();
    let version = parts.next().ok_or_else(malformed)?;
    if !version.starts_with("HTTP/") {
        return Err(malformed());
    }
    let code = parts.next().ok_or_else(malformed)?;
    code.parse::<u32>().map_err(|_| malformed())
}

/// Parse header lines of one response block. The first non-empty line must be
/// the status line. Header values are kept raw so that a rejected status is
/// reported before any header complaint.
pub(crate) fn parse_response_head(lines: &[String]) -> Result<ResponseHead, FetchError> {
    let mut lines = lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty());
    let status_line = lines
        .next()
        .ok_or_else(|| FetchError::MalformedStatusLine(String::new()))?;
    let status = parse_status_line(status_line)?;

    let mut head = ResponseHead {
        status,
        ..ResponseHead::default()
    };
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                head.content_length = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-range") {
                head.content_range = Some(value.to_string());
            }
        }
    }
    Ok(head)
}

pub(crate) fn parse_content_length(value: &str) -> Result<u64, FetchError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| FetchError::MalformedHeader {
            name: "Content-Length",
            value: value.to_string(),
        })
}

pub(crate) fn parse_content_range(value: &str) -> Result<ContentRange, FetchError> {
    let malformed = || FetchError::MalformedHeader {
        name: "Content-Range",
        value: value.to_string(),
    };
    let rest = value.trim();
    let rest = rest
        .get(..6)
        .filter(|unit| unit.eq_ignore_ascii_case("bytes "))
        .map(|_| &rest[6..])
        .ok_or_else(malformed)?;
    let (range, total) = rest.split_once('/').ok_or_else(malformed)?;
    let (start, end) = range.trim().split_once('-').ok_or_else(malformed)?;
    let start = start.trim().parse::<u64>().map_err(|_| malformed())?;
    let end = end.trim().parse::<u64>().map_err(|_| malformed())?;
    let total = match total.trim() {
        "*" => None,
        t => Some(t.parse::<u64>().map_err(|_| malformed())?),
    };
    if end < start {
        return Err(malformed());
    }
    Ok(ContentRange { start, end, total })
}
