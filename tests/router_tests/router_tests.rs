//! Router Tests
//!
//! Tests verify:
//! - Route resolution (method checked before path)
//! - Each CRUD operation against the store
//! - Error bodies and status codes

use std::sync::Arc;

use flatkv::protocol::{Request, Response};
use flatkv::router::Route;
use flatkv::{Router, Store};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_router() -> (Arc<Store>, Router) {
    let store = Arc::new(Store::new());
    let router = Router::new(Arc::clone(&store));
    (store, router)
}

fn call(router: &Router, method: &str, path: &str, body: &str) -> Response {
    router.handle(&Request::new(method, path).with_body(body))
}

fn assert_response(response: &Response, status: u16, body: &str) {
    assert_eq!(response.status, status, "body was {}", response.body);
    assert_eq!(response.body, body);
}

// =============================================================================
// Route Resolution Tests
// =============================================================================

#[test]
fn test_resolve_known_routes() {
    assert_eq!(Route::resolve("GET", "/api/data"), Route::List);
    assert_eq!(
        Route::resolve("GET", "/api/data/name"),
        Route::Fetch { key: "name".to_string() }
    );
    assert_eq!(Route::resolve("POST", "/api/data"), Route::Create);
    assert_eq!(
        Route::resolve("PUT", "/api/data/name"),
        Route::Update { key: "name".to_string() }
    );
    assert_eq!(
        Route::resolve("DELETE", "/api/data/name"),
        Route::Remove { key: "name".to_string() }
    );
}

#[test]
fn test_resolve_unknown_paths() {
    assert_eq!(Route::resolve("GET", "/"), Route::NotFound);
    assert_eq!(Route::resolve("GET", "/api/database"), Route::NotFound);
    assert_eq!(Route::resolve("POST", "/api/data/name"), Route::NotFound);
    assert_eq!(Route::resolve("PUT", "/api/data"), Route::NotFound);
    assert_eq!(Route::resolve("DELETE", "/api/data"), Route::NotFound);
}

#[test]
fn test_resolve_method_checked_before_path() {
    assert_eq!(Route::resolve("PATCH", "/api/data"), Route::MethodNotAllowed);
    assert_eq!(Route::resolve("PATCH", "/nowhere"), Route::MethodNotAllowed);
    assert_eq!(Route::resolve("get", "/api/data"), Route::MethodNotAllowed);
}

#[test]
fn test_resolve_empty_key() {
    assert_eq!(
        Route::resolve("GET", "/api/data/"),
        Route::Fetch { key: String::new() }
    );
}

#[test]
fn test_resolve_key_keeps_remaining_path() {
    assert_eq!(
        Route::resolve("GET", "/api/data/a/b?c=d"),
        Route::Fetch { key: "a/b?c=d".to_string() }
    );
}

// =============================================================================
// CRUD Scenario Tests
// =============================================================================

#[test]
fn test_post_then_get() {
    let (_store, router) = setup_router();

    let created = call(&router, "POST", "/api/data", "{\"name\":\"widget\"}");
    assert_response(&created, 201, "{\"message\":\"Data saved successfully\"}");

    let fetched = call(&router, "GET", "/api/data/name", "");
    assert_response(&fetched, 200, "{\"name\":\"widget\"}");
}

#[test]
fn test_get_missing_item() {
    let (_store, router) = setup_router();

    let response = call(&router, "GET", "/api/data/missing", "");

    assert_response(&response, 404, "{\"error\":\"Item not found\"}");
}

#[test]
fn test_put_updates_value() {
    let (store, router) = setup_router();
    call(&router, "POST", "/api/data", "{\"name\":\"widget\"}");

    let updated = call(&router, "PUT", "/api/data/name", "{\"value\":\"gadget\"}");
    assert_response(&updated, 200, "{\"message\":\"Data updated successfully\"}");

    let fetched = call(&router, "GET", "/api/data/name", "");
    assert_response(&fetched, 200, "{\"name\":\"gadget\"}");
    assert_eq!(store.len(), 1);
}

#[test]
fn test_put_creates_missing_key() {
    let (store, router) = setup_router();

    let response = call(&router, "PUT", "/api/data/fresh", "{\"value\":\"v\"}");

    assert_eq!(response.status, 200);
    assert_eq!(store.get("fresh"), Some("v".to_string()));
}

#[test]
fn test_put_without_value_field() {
    let (store, router) = setup_router();

    let response = call(&router, "PUT", "/api/data/name", "{}");
    assert_response(&response, 400, "{\"error\":\"Missing 'value' field\"}");

    let response = call(&router, "PUT", "/api/data/name", "{\"other\":\"x\"}");
    assert_response(&response, 400, "{\"error\":\"Missing 'value' field\"}");
    assert!(store.is_empty());
}

#[test]
fn test_post_invalid_json() {
    let (store, router) = setup_router();

    for body in ["", "{}", "not json", "{\"n\": 1}"] {
        let response = call(&router, "POST", "/api/data", body);
        assert_response(&response, 400, "{\"error\":\"Invalid JSON\"}");
    }
    assert!(store.is_empty());
}

#[test]
fn test_post_multiple_fields_merges() {
    let (store, router) = setup_router();
    store.set_one("keep", "1");

    let response = call(&router, "POST", "/api/data", "{\"a\":\"x\",\"b\":\"y\"}");

    assert_eq!(response.status, 201);
    assert_eq!(store.len(), 3);
    assert_eq!(store.get("b"), Some("y".to_string()));
}

#[test]
fn test_get_all() {
    let (store, router) = setup_router();

    assert_response(&call(&router, "GET", "/api/data", ""), 200, "{}");

    store.set_one("b", "2");
    store.set_one("a", "1");
    assert_response(
        &call(&router, "GET", "/api/data", ""),
        200,
        "{\"a\":\"1\",\"b\":\"2\"}",
    );
}

#[test]
fn test_delete_is_not_idempotent_in_status() {
    let (store, router) = setup_router();
    store.set_one("k", "v");

    let first = call(&router, "DELETE", "/api/data/k", "");
    assert_response(&first, 200, "{\"message\":\"Data deleted successfully\"}");

    let second = call(&router, "DELETE", "/api/data/k", "");
    assert_response(&second, 404, "{\"error\":\"Item not found\"}");
}

#[test]
fn test_unsupported_method() {
    let (_store, router) = setup_router();

    let response = call(&router, "PATCH", "/api/data", "");

    assert_response(&response, 405, "{\"error\":\"Method not allowed\"}");
    assert_eq!(response.reason, "Method Not Allowed");
}

#[test]
fn test_unknown_endpoint() {
    let (_store, router) = setup_router();

    for (method, path) in [("GET", "/"), ("POST", "/api/data/x"), ("PUT", "/api/data")] {
        let response = call(&router, method, path, "{\"value\":\"v\"}");
        assert_response(&response, 404, "{\"error\":\"Endpoint not found\"}");
    }
}

#[test]
fn test_responses_carry_default_headers() {
    let (_store, router) = setup_router();

    let response = call(&router, "GET", "/api/data", "");

    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(response.header("Connection"), Some("close"));
}
