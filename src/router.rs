//! Router Module
//!
//! Maps a parsed request onto an operation against the shared store.
//!
//! ## Routes
//! - `GET    /api/data`       - every entry
//! - `GET    /api/data/{key}` - one entry
//! - `POST   /api/data`       - merge the fields of a flat JSON body
//! - `PUT    /api/data/{key}` - set `key` to the body's `"value"` field
//! - `DELETE /api/data/{key}` - remove one entry
//!
//! The method is checked before the path: an unknown method is always 405,
//! an unknown path under a known method is 404.

use std::sync::Arc;

use crate::protocol::json;
use crate::protocol::{Request, Response};
use crate::store::Store;

/// Collection path
pub const COLLECTION_PATH: &str = "/api/data";

/// Prefix of item paths; the key is everything after it
pub const ITEM_PREFIX: &str = "/api/data/";

/// Methods the router serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Match a method token (case-sensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            _ => None,
        }
    }
}

/// A resolved route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Return every entry
    List,

    /// Return one entry
    Fetch { key: String },

    /// Merge the fields of the body into the store
    Create,

    /// Set one entry from the body's `"value"` field
    Update { key: String },

    /// Remove one entry
    Remove { key: String },

    /// Known method, unknown path
    NotFound,

    /// Unknown method
    MethodNotAllowed,
}

impl Route {
    /// Resolve a method token and path
    pub fn resolve(method: &str, path: &str) -> Self {
        let Some(method) = Method::from_token(method) else {
            return Route::MethodNotAllowed;
        };

        let item_key = path.strip_prefix(ITEM_PREFIX).map(str::to_string);

        match (method, item_key) {
            (Method::Get, _) if path == COLLECTION_PATH => Route::List,
            (Method::Get, Some(key)) => Route::Fetch { key },
            (Method::Post, _) if path == COLLECTION_PATH => Route::Create,
            (Method::Put, Some(key)) => Route::Update { key },
            (Method::Delete, Some(key)) => Route::Remove { key },
            _ => Route::NotFound,
        }
    }
}

/// Stateless dispatcher over an injected store
#[derive(Debug, Clone)]
pub struct Router {
    store: Arc<Store>,
}

impl Router {
    /// Create a router over the given store
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Handle a request
    ///
    /// Never fails: application errors become JSON `error` responses.
    pub fn handle(&self, request: &Request) -> Response {
        tracing::debug!("Processing {} {}", request.method, request.path);

        self.execute(Route::resolve(&request.method, &request.path), &request.body)
    }

    /// Execute a resolved route
    pub fn execute(&self, route: Route, body: &str) -> Response {
        match route {
            Route::List => Response::with_body(200, json::encode_flat(&self.store.get_all())),
            Route::Fetch { key } => match self.store.get(&key) {
                Some(value) => Response::with_body(200, json::encode_flat([(key, value)])),
                None => Response::error(404, "Item not found"),
            },
            Route::Create => {
                let fields = json::decode_flat(body);
                if fields.is_empty() {
                    return Response::error(400, "Invalid JSON");
                }
                self.store.set_many(fields);
                Response::message(201, "Data saved successfully")
            }
            Route::Update { key } => match json::decode_flat(body).remove("value") {
                Some(value) => {
                    self.store.set_one(key, value);
                    Response::message(200, "Data updated successfully")
                }
                None => Response::error(400, "Missing 'value' field"),
            },
            Route::Remove { key } => {
                if self.store.delete(&key) {
                    Response::message(200, "Data deleted successfully")
                } else {
                    Response::error(404, "Item not found")
                }
            }
            Route::NotFound => Response::error(404, "Endpoint not found"),
            Route::MethodNotAllowed => Response::error(405, "Method not allowed"),
        }
    }
}
