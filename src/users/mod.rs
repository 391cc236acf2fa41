//! User services.
//!
//! [`demo`] is the fixed-payload demo API. The rest of this module is the
//! PostgreSQL-backed service:
//!
//! | Method | Path | Body | Reply |
//! |---|---|---|---|
//! | `GET` | `/health` | | `200`, `503` |
//! | `GET` | `/users` | | `200` array of `{id,name}` |
//! | `POST` | `/users` | `{"name"}` | `200 {id,name}`, `400` |
//! | `DELETE` | `/users/{id}` | | `200 User deleted`, `400` |
//!
//! Database failures answer `500 {"error":"internal error"}`.

pub mod demo;

mod db;
mod handlers;
mod repository;

use http::Method;

pub use db::connect_with_retry;
pub use repository::{
    MemoryUserRepository, PgUserRepository, SharedUserRepository, StoreError, StoreResult, User,
    UserRepository,
};

use crate::handler::with_state;
use crate::middleware::{from_fn, logging};
use crate::router::Router;

/// Router for the persisted service. Requests are logged; there is no
/// API-key check on this service.
pub fn router(repo: SharedUserRepository) -> Router {
    Router::new()
        .on(Method::GET, "/health", with_state(repo.clone(), handlers::health))
        .on(Method::GET, "/users", with_state(repo.clone(), handlers::list))
        .on(Method::POST, "/users", with_state(repo.clone(), handlers::create))
        .on(Method::DELETE, "/users/{id}", with_state(repo, handlers::delete))
        .layer(from_fn(logging))
}
