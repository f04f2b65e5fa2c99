//! Protocol Module
//!
//! Defines the wire format between HTTP clients and the server.
//!
//! ## Request Format (lenient HTTP/1.1 subset)
//! ```text
//! METHOD SP PATH SP VERSION LF
//! Name: value LF          (zero or more, lines without ':' are skipped)
//! LF                      (blank line, or a bare CR)
//! body...                 (remaining lines joined with LF)
//! ```
//!
//! ### Response Format
//! ```text
//! HTTP/1.1 SP CODE SP TEXT CRLF
//! Name: value CRLF        (sorted by name)
//! Content-Length: N CRLF  (always computed)
//! CRLF
//! body
//! ```
//!
//! No chunked bodies, no keep-alive, no pipelining: one request per
//! connection. Bodies are flat JSON objects, see [`json`].

mod request;
mod response;
mod codec;
pub mod json;

pub use request::Request;
pub use response::{reason_phrase, Response};
pub use codec::{encode_request, parse_request, parse_response, serialize_response};
