//! Response definitions
//!
//! Represents responses to clients.

use std::collections::BTreeMap;

use super::json;

/// A response to send to a client
///
/// `Content-Length` is never stored here; the codec computes it from the
/// body when serializing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: u16,

    /// Status text, e.g. `Not Found`
    pub reason: String,

    /// Header mapping, serialized in key order
    pub headers: BTreeMap<String, String>,

    /// Raw body text
    pub body: String,
}

impl Response {
    /// Create a response with the default JSON headers and an empty body
    pub fn new(status: u16) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Connection".to_string(), "close".to_string());

        Self {
            status,
            reason: reason_phrase(status).to_string(),
            headers,
            body: String::new(),
        }
    }

    /// Create a response carrying `body` verbatim
    pub fn with_body(status: u16, body: impl Into<String>) -> Self {
        let mut response = Self::new(status);
        response.body = body.into();
        response
    }

    /// `{"message": ...}` response
    pub fn message(status: u16, message: &str) -> Self {
        Self::with_body(status, json::encode_flat([("message", message)]))
    }

    /// `{"error": ...}` response
    pub fn error(status: u16, message: &str) -> Self {
        Self::with_body(status, json::encode_flat([("error", message)]))
    }

    /// Set a header; `Content-Length` is ignored since it is always computed
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if !name.eq_ignore_ascii_case("content-length") {
            self.headers.insert(name, value.into());
        }
        self
    }

    /// Look up a header by its exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Standard status text for the codes this server produces
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Unknown",
    }
}
