//! Error Pipeline End-to-End Tests
//!
//! Drives the fully layered router with failing handlers and checks the
//! status, body, content type and headers that reach the client.

use axum::body::{to_bytes, Body};
use axum::extract::Query;
use axum::http::header::{ALLOW, CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::Value;
use tower::ServiceExt;

use embedgate::http_server::{AppState, HttpServer, ServerConfig};
use embedgate::Failure;

// =============================================================================
// Helper Functions
// =============================================================================

async fn exploding_handler() -> &'static str {
    panic!("handler exploded")
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    url: String,
}

async fn lookup_handler(Query(params): Query<LookupParams>) -> String {
    params.url
}

fn domain_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/missing",
            get(|| async {
                Err::<(), _>(
                    Failure::not_found("Link not found").with_messages(["no provider matched"]),
                )
            }),
        )
        .route(
            "/api/timeout",
            get(|| async { Err::<(), _>(Failure::generic("upstream timed out 408")) }),
        )
        .route(
            "/api/unauthorized",
            get(|| async { Err::<(), _>(Failure::generic("").with_code(401)) }),
        )
        .route(
            "/api/bad-request",
            get(|| async { Err::<(), _>(Failure::generic("url param is required").with_code(400)) }),
        )
        .route(
            "/api/io",
            get(|| async {
                Err::<(), _>(Failure::from(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk <full> & sad",
                )))
            }),
        )
        .route("/api/panic", get(exploding_handler))
        .route("/api/ok", get(|| async { "ok" }))
        .route("/api/lookup", get(lookup_handler))
}

fn app(config: ServerConfig) -> Router {
    HttpServer::new(config).with_routes(domain_routes()).router()
}

async fn get_response(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =============================================================================
// End-to-End Scenarios
// =============================================================================

/// NotFound + default format: 404 with the exact JSON body.
#[tokio::test]
async fn test_not_found_json_body() {
    let response = get_response(app(ServerConfig::default()), "/api/missing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(response.headers()[CACHE_CONTROL], "max-age=600");
    assert_eq!(
        body_string(response).await,
        r#"{"error":{"source":"iframely","code":404,"message":"Link not found","messages":["no provider matched"]}}"#
    );
}

/// Sniffed 408 + format=xml: markup body with Timeout.
#[tokio::test]
async fn test_sniffed_timeout_as_xml() {
    let response = get_response(app(ServerConfig::default()), "/api/timeout?format=xml").await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/xml");
    assert_eq!(response.headers()[CACHE_CONTROL], "max-age=60");

    let body = body_string(response).await;
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>"#));
    assert!(body.contains("<message>Timeout</message>"));
    assert!(body.contains("<code>408</code>"));
    assert!(body.contains("<source>iframely</source>"));
}

/// Explicit 401 is answered as 403 "Unauthorized".
#[tokio::test]
async fn test_unauthorized_rewritten_to_forbidden() {
    let response = get_response(app(ServerConfig::default()), "/api/unauthorized").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["code"], 403);
    assert_eq!(body["error"]["message"], "Unauthorized");
    assert!(body["error"].get("messages").is_none());
}

/// 400 keeps the original message behind a prefix.
#[tokio::test]
async fn test_bad_request_message() {
    let response = get_response(app(ServerConfig::default()), "/api/bad-request").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["message"], "Bad Request: url param is required");
}

/// Raw error text never leaks for generic 500s.
#[tokio::test]
async fn test_io_failure_is_server_error() {
    let response = get_response(app(ServerConfig::default()), "/api/io?format=xml").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("<message>Server error</message>"));
    assert!(!body.contains("disk"));
}

// =============================================================================
// Framework Rejections
// =============================================================================

/// A query extractor rejection is answered with the error document.
#[tokio::test]
async fn test_query_rejection_rendered_as_xml() {
    let response = get_response(app(ServerConfig::default()), "/api/lookup?format=xml").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/xml");
    assert_eq!(response.headers()[CACHE_CONTROL], "max-age=60");

    let body = body_string(response).await;
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>"#));
    assert!(body.contains("<code>400</code>"));
    assert!(body.contains("<message>Bad Request: Failed to deserialize query string"));
    assert!(body.contains("<source>iframely</source>"));
}

/// Valid queries still reach the handler untouched.
#[tokio::test]
async fn test_query_accepted() {
    let response = get_response(app(ServerConfig::default()), "/api/lookup?url=https://a.com").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "https://a.com");
}

/// Wrong method on a known route: 405 document, `Allow` kept.
#[tokio::test]
async fn test_method_not_allowed_rendered() {
    let response = app(ServerConfig::default())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/ok?format=xml")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/xml");
    assert!(response.headers()[ALLOW].to_str().unwrap().contains("GET"));

    let body = body_string(response).await;
    assert!(body.contains("<code>405</code>"));
    assert!(body.contains("<message>Server error</message>"));
}

// =============================================================================
// Supervision and Built-in Routes
// =============================================================================

/// A panicking handler yields the 500 error document; the router survives.
#[tokio::test]
async fn test_panicking_handler_renders_server_error() {
    let router = app(ServerConfig::default());

    let response = get_response(router.clone(), "/api/panic").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["message"], "Server error");

    let response = get_response(router, "/api/ok").await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Unmatched routes get the standard 404 document.
#[tokio::test]
async fn test_unknown_route_is_not_found_document() {
    let response = get_response(app(ServerConfig::default()), "/no/such/page").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["source"], "iframely");
    assert_eq!(body["error"]["message"], "Page not found");
}

/// Root redirects to the configured home page with 302.
#[tokio::test]
async fn test_root_redirects_home() {
    let config = ServerConfig {
        home_url: "https://example.org/".to_string(),
        ..Default::default()
    };
    let response = get_response(app(config), "/").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "https://example.org/");
}

#[tokio::test]
async fn test_health() {
    let response = get_response(app(ServerConfig::default()), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
}

/// Every response carries the product header.
#[tokio::test]
async fn test_powered_by_on_every_response() {
    let router = app(ServerConfig::default());

    for uri in ["/api/ok", "/api/missing", "/api/timeout?format=xml", "/nope"] {
        let response = get_response(router.clone(), uri).await;
        assert_eq!(response.headers()["x-powered-by"], "Iframely", "{}", uri);
    }
}
