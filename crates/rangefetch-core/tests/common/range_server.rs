//! Minimal HTTP/1.1 server answering Range GETs for integration tests.
//!
//! Serves a single static body, one connection per request, and can be told
//! to misbehave in the ways the fetch loop has to cope with.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// 206 with the requested slice; range end read as inclusive (standard HTTP).
    InclusiveEnd,
    /// 206 with the requested slice; range end read as exclusive.
    ExclusiveEnd,
    /// 200 with the full body; Range ignored.
    IgnoreRange,
    /// Always this status with an empty body.
    Status(u16),
    /// Declare the exclusive-end slice length but send at most this many bytes, then close.
    Truncate(usize),
    /// 206 with the body delimited by connection close.
    NoContentLength,
    /// 206 whose Content-Range starts one byte past the requested offset.
    WrongContentRange,
}

/// Handle to a running server. The server runs until the process exits.
pub struct RangeServer {
    pub url: String,
    range_headers: Arc<Mutex<Vec<String>>>,
}

impl RangeServer {
    /// `Range` header values received so far, in arrival order.
    pub fn range_headers(&self) -> Vec<String> {
        self.range_headers.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread serving `body`.
pub fn start(body: Vec<u8>, behavior: Behavior) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let range_headers = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&range_headers);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &body, behavior, &seen));
        }
    });
    RangeServer {
        url: format!("http://127.0.0.1:{}/", port),
        range_headers,
    }
}

/// A URL on which nothing listens.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, body: &[u8], behavior: Behavior, seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let range_value = range_header(&request);
    if let Some(v) = &range_value {
        seen.lock().unwrap().push(v.clone());
    }
    let range = range_value.as_deref().and_then(parse_range);
    let total = body.len();

    match behavior {
        Behavior::InclusiveEnd | Behavior::ExclusiveEnd => {
            let inclusive = matches!(behavior, Behavior::InclusiveEnd);
            let (start, data) = slice(body, range, inclusive);
            write_partial(&mut stream, start, data, total);
        }
        Behavior::WrongContentRange => {
            let (start, data) = slice(body, range, false);
            write_partial(&mut stream, start + 1, data, total);
        }
        Behavior::IgnoreRange => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                total
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        Behavior::Status(code) => {
            let head = format!(
                "HTTP/1.1 {} Test Status\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                code
            );
            let _ = stream.write_all(head.as_bytes());
        }
        Behavior::Truncate(max) => {
            let (start, data) = slice(body, range, false);
            let head = format!(
                "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
                data.len(),
                content_range(start, data.len(), total)
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&data[..data.len().min(max)]);
        }
        Behavior::NoContentLength => {
            let (_, data) = slice(body, range, false);
            let _ = stream.write_all(b"HTTP/1.1 206 Partial Content\r\nConnection: close\r\n\r\n");
            let _ = stream.write_all(data);
        }
    }
    let _ = stream.flush();
}

/// Slice of `body` for a literal `(start, end)` range; no range means the whole body.
fn slice(body: &[u8], range: Option<(u64, u64)>, inclusive: bool) -> (usize, &[u8]) {
    let total = body.len();
    let (start, end) = range.unwrap_or((0, total as u64));
    let start = (start as usize).min(total);
    let end = (end as usize).saturating_add(usize::from(inclusive)).clamp(start, total);
    (start, &body[start..end])
}

fn write_partial(stream: &mut TcpStream, range_start: usize, data: &[u8], total: usize) {
    let head = format!(
        "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        data.len(),
        content_range(range_start, data.len(), total)
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(data);
}

/// `Content-Range` header line, or nothing for an empty slice.
fn content_range(start: usize, len: usize, total: usize) -> String {
    if len == 0 {
        return String::new();
    }
    format!("Content-Range: bytes {}-{}/{}\r\n", start, start + len - 1, total)
}

/// Reads until the blank line that ends the request head.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(buf).ok()
}

fn range_header(request: &str) -> Option<String> {
    request.lines().skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("range")
            .then(|| value.trim().to_string())
    })
}

/// `bytes=X-Y` -> (X, Y), taken literally.
fn parse_range(value: &str) -> Option<(u64, u64)> {
    let part = value.strip_prefix("bytes=")?;
    let (a, b) = part.split_once('-')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}
