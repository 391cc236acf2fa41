//! In-memory task list service.
//!
//! | Method | Path | Body | Reply |
//! |---|---|---|---|
//! | `GET` | `/tasks` | | `200` array of tasks |
//! | `GET` | `/tasks?id=N` | | `200` task, `400`, `404` |
//! | `POST` | `/tasks` | `{"title"}` | `201` task, `400` |
//! | `PATCH` | `/tasks?id=N` | `{"done"}` | `200 {"updated":true}`, `400`, `404` |
//!
//! Every request is logged and must carry a valid `X-API-KEY`.

mod handlers;
mod store;

use http::Method;

pub use store::{MemoryTaskStore, SharedTaskStore, Task, TaskStore};

use crate::handler::with_state;
use crate::middleware::{ApiKeyAuth, KeyVerifier, from_fn, logging};
use crate::router::Router;

pub fn router(store: SharedTaskStore, keys: impl KeyVerifier) -> Router {
    Router::new()
        .on(Method::GET, "/tasks", with_state(store.clone(), handlers::get))
        .on(Method::POST, "/tasks", with_state(store.clone(), handlers::create))
        .on(Method::PATCH, "/tasks", with_state(store, handlers::update))
        .layer(from_fn(logging))
        .layer(ApiKeyAuth::new(keys))
}
