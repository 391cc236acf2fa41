//! Demo user API.
//!
//! Shows the routing and middleware pattern only: every handler answers
//! with a fixed payload and nothing is stored.

use http::{Method, StatusCode};
use serde_json::{Value, json};

use crate::health;
use crate::middleware::{ApiKeyAuth, KeyVerifier, from_fn, logging};
use crate::{Json, Request, Router};

pub fn router(keys: impl KeyVerifier) -> Router {
    Router::new()
        .on(Method::GET, "/health", health::liveness)
        .on(Method::GET, "/users", list)
        .on(Method::GET, "/users/{id}", get)
        .on(Method::POST, "/users", create)
        .on(Method::PUT, "/users/{id}", update)
        .on(Method::DELETE, "/users/{id}", delete)
        .layer(from_fn(logging))
        .layer(ApiKeyAuth::new(keys))
}

async fn list(_req: Request) -> Json<[&'static str; 1]> {
    Json(["demo user"])
}

/// Echoes the path segment back without looking anything up.
async fn get(req: Request) -> Json<Value> {
    Json(json!({ "id": req.param("id").unwrap_or_default() }))
}

async fn create(_req: Request) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "message": "created" })))
}

/// The id is parsed but an unparseable one is not rejected.
async fn update(req: Request) -> Json<Value> {
    let id = req.param("id").and_then(|raw| raw.parse::<i64>().ok());
    tracing::debug!(?id, "demo update");
    Json(json!({ "message": "updated" }))
}

async fn delete(_req: Request) -> Json<Value> {
    Json(json!({ "message": "deleted" }))
}
