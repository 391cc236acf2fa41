//! End-to-end tests for the demo user service.

use bytes::Bytes;
use crudsvc::Service;
use crudsvc::middleware::StaticKeys;
use crudsvc::users::demo;
use http::{Method, StatusCode};
use serde_json::{Value, json};

const KEY: &str = "12345";

fn app() -> Service {
    demo::router(StaticKeys::new([KEY])).into_service()
}

fn request(method: Method, uri: &str, key: Option<&str>) -> http::Request<Bytes> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header("X-API-KEY", key);
    }
    builder.body(Bytes::from_static(br#"{"name":"ignored"}"#)).unwrap()
}

async fn call(method: Method, uri: &str) -> (StatusCode, Value) {
    let resp = app().call(request(method, uri, Some(KEY))).await;
    assert_eq!(resp.header("content-type"), Some("application/json"));
    (resp.status_code(), serde_json::from_slice(resp.body()).unwrap())
}

#[tokio::test]
async fn fixed_payloads() {
    assert_eq!(call(Method::GET, "/health").await, (StatusCode::OK, json!({ "status": "ok" })));
    assert_eq!(call(Method::GET, "/users").await, (StatusCode::OK, json!(["demo user"])));
    assert_eq!(call(Method::GET, "/users/abc").await, (StatusCode::OK, json!({ "id": "abc" })));
    assert_eq!(
        call(Method::POST, "/users").await,
        (StatusCode::CREATED, json!({ "message": "created" }))
    );
    assert_eq!(
        call(Method::PUT, "/users/not-a-number").await,
        (StatusCode::OK, json!({ "message": "updated" }))
    );
    assert_eq!(
        call(Method::DELETE, "/users/3").await,
        (StatusCode::OK, json!({ "message": "deleted" }))
    );
}

#[tokio::test]
async fn nothing_is_stored() {
    let app = app();
    app.call(request(Method::POST, "/users", Some(KEY))).await;
    let resp = app.call(request(Method::GET, "/users", Some(KEY))).await;
    assert_eq!(resp.body(), br#"["demo user"]"#);
}

#[tokio::test]
async fn missing_or_wrong_key_is_unauthorized_everywhere() {
    let app = app();
    let routes = [
        (Method::GET, "/health"),
        (Method::GET, "/users"),
        (Method::GET, "/users/1"),
        (Method::POST, "/users"),
        (Method::PUT, "/users/1"),
        (Method::DELETE, "/users/1"),
        (Method::PATCH, "/nowhere"),
    ];
    for (method, uri) in routes {
        for key in [None, Some("wrong")] {
            let resp = app.call(request(method.clone(), uri, key)).await;
            assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED, "{method} {uri} {key:?}");
            assert_eq!(resp.body(), b"Unauthorized");
        }
    }
}

#[tokio::test]
async fn unrouted_method_is_not_allowed() {
    let resp = app().call(request(Method::PATCH, "/users/1", Some(KEY))).await;
    assert_eq!(resp.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}
