//! Request definitions
//!
//! Represents a request as read off a client connection.

use std::collections::BTreeMap;

/// A parsed HTTP request
///
/// Header names keep the case the client sent; a repeated name keeps the
/// last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method token, e.g. `GET`
    pub method: String,

    /// Request target, e.g. `/api/data/name`
    pub path: String,

    /// Protocol version token, e.g. `HTTP/1.1`
    pub version: String,

    /// Header mapping
    pub headers: BTreeMap<String, String>,

    /// Raw body text
    pub body: String,
}

impl Request {
    /// Create a bodiless `HTTP/1.1` request
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            version: "HTTP/1.1".to_string(),
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    /// Attach a body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach a header, replacing any previous value under the same name
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Look up a header by its exact name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
