//! Protocol codec
//!
//! Pure transforms between wire bytes and [`Request`] / [`Response`].
//!
//! The request parser is deliberately lenient: lines are split on LF, a
//! trailing CR is tolerated wherever it matters, header lines without a colon
//! are skipped and everything after the blank line is the body. It does not
//! look at `Content-Length`; the body is whatever was buffered.

use std::collections::BTreeMap;

use bytes::{Bytes, BytesMut};

use crate::error::{FlatKvError, Result};
use super::{Request, Response};

const CONTENT_LENGTH: &str = "Content-Length";

/// Terminator between response head and body
const HEAD_END: &str = "\r\n\r\n";

// =============================================================================
// Request Parsing/Encoding
// =============================================================================

/// Parse a buffered request
///
/// Fails only when the buffer is empty or the first line does not hold a
/// method, a path and a version.
pub fn parse_request(bytes: &[u8]) -> Result<Request> {
    if bytes.is_empty() {
        return Err(FlatKvError::MalformedRequest("empty request".to_string()));
    }

    let text = String::from_utf8_lossy(bytes);
    let mut lines = split_lines(&text);

    let start_line = lines.next().unwrap_or_default();
    let mut tokens = start_line.split_whitespace();
    let (method, path, version) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(path), Some(version)) => (method, path, version),
        _ => {
            return Err(FlatKvError::MalformedRequest(format!(
                "malformed start line: {:?}",
                start_line
            )))
        }
    };

    let mut headers = BTreeMap::new();
    for line in lines.by_ref() {
        if line.is_empty() || line == "\r" {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(trim_field(name).to_string(), trim_field(value).to_string());
        }
    }

    let body = lines.collect::<Vec<_>>().join("\n");

    Ok(Request {
        method: method.to_string(),
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
    })
}

/// Encode a request for sending (client side)
///
/// Headers are written in key order followed by a computed `Content-Length`.
pub fn encode_request(request: &Request) -> Bytes {
    let mut buf = BytesMut::with_capacity(128 + request.body.len());
    buf.extend_from_slice(
        format!("{} {} {}\r\n", request.method, request.path, request.version).as_bytes(),
    );
    write_head_fields(&mut buf, &request.headers, request.body.len());
    buf.extend_from_slice(request.body.as_bytes());
    buf.freeze()
}

// =============================================================================
// Response Serialization/Parsing
// =============================================================================

/// Serialize a response to wire bytes
///
/// Format: status line, headers in key order, `Content-Length`, blank line,
/// body. Never fails.
pub fn serialize_response(response: &Response) -> Bytes {
    let mut buf = BytesMut::with_capacity(128 + response.body.len());
    buf.extend_from_slice(
        format!("HTTP/1.1 {} {}\r\n", response.status, response.reason).as_bytes(),
    );
    write_head_fields(&mut buf, &response.headers, response.body.len());
    buf.extend_from_slice(response.body.as_bytes());
    buf.freeze()
}

/// Parse a complete response (client side)
///
/// The returned headers do not include `Content-Length`; the body is cut to
/// the advertised length when one is present.
pub fn parse_response(bytes: &[u8]) -> Result<Response> {
    let text = String::from_utf8_lossy(bytes);
    let (head, rest) = text
        .split_once(HEAD_END)
        .ok_or_else(|| FlatKvError::MalformedResponse("missing end of headers".to_string()))?;

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(FlatKvError::MalformedResponse(format!(
            "bad status line: {:?}",
            status_line
        )));
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| {
            FlatKvError::MalformedResponse(format!("bad status code in {:?}", status_line))
        })?;
    let reason = parts.next().unwrap_or_default().to_string();

    let mut headers = BTreeMap::new();
    let mut content_length = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else { continue };
        let (name, value) = (trim_field(name), trim_field(value));
        if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            let length = value.parse::<usize>().map_err(|_| {
                FlatKvError::MalformedResponse(format!("bad Content-Length: {:?}", value))
            })?;
            content_length = Some(length);
        } else {
            headers.insert(name.to_string(), value.to_string());
        }
    }

    let body = match content_length {
        Some(length) => rest
            .as_bytes()
            .get(..length)
            .map(|body| String::from_utf8_lossy(body).into_owned())
            .ok_or_else(|| {
                FlatKvError::MalformedResponse(format!(
                    "incomplete body: expected {} bytes, got {}",
                    length,
                    rest.len()
                ))
            })?,
        None => rest.to_string(),
    };

    Ok(Response {
        status,
        reason,
        headers,
        body,
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Split on LF the way a line reader does: a final LF does not start an
/// extra empty line.
fn split_lines(text: &str) -> std::str::Split<'_, char> {
    text.strip_suffix('\n').unwrap_or(text).split('\n')
}

/// Trim blanks around a header name or value, plus a trailing CR
fn trim_field(field: &str) -> &str {
    field
        .trim_start_matches(|c: char| c == ' ' || c == '\t')
        .trim_end_matches(|c: char| c == ' ' || c == '\t' || c == '\r')
}

fn write_head_fields(buf: &mut BytesMut, headers: &BTreeMap<String, String>, body_len: usize) {
    for (name, value) in headers {
        if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            continue;
        }
        buf.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
    }
    buf.extend_from_slice(format!("{}: {}\r\n\r\n", CONTENT_LENGTH, body_len).as_bytes());
}
