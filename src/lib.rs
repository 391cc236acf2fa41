//! # crudsvc
//!
//! Three small JSON-over-HTTP CRUD services and the minimal hyper framework
//! they share.
//!
//! - [`tasks`]: an in-memory task list (`/tasks`, id in the query string).
//! - [`users::demo`]: a fixed-payload user API that only shows the routing
//!   and middleware pattern.
//! - [`users`]: a user table in PostgreSQL.
//!
//! The framework part:
//!
//! - Radix-tree routing per method via [`matchit`], with 404 and 405
//! - Middleware layers wrapping the router ([`middleware`])
//! - Graceful shutdown on SIGTERM / Ctrl-C with a bounded grace period
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crudsvc::{Server, middleware::StaticKeys, tasks};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), crudsvc::Error> {
//!     let store = Arc::new(tasks::MemoryTaskStore::new());
//!     let app = tasks::router(store, StaticKeys::new(["12345"]));
//!     Server::bind("0.0.0.0:8080")?.serve(app).await
//! }
//! ```

mod error;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod handler;
pub mod health;
pub mod middleware;
pub mod tasks;
pub mod telemetry;
pub mod users;

pub use error::{ApiError, Error};
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::{Router, Service};
pub use server::Server;
