//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: request logging and authentication-header
//! inspection. Layers are registered with [`Router::layer`](crate::Router::layer)
//! and wrap routing itself.
//!
//! Write a middleware either as a type implementing [`Middleware`] or as a
//! plain async function wrapped in [`from_fn`]:
//!
//! ```rust
//! use crudsvc::{Request, Response, Router};
//! use crudsvc::middleware::{Next, from_fn};
//!
//! async fn tag(req: Request, next: Next) -> Response {
//!     let mut resp = next.run(req).await;
//!     resp.set_header("x-served-by", "crudsvc");
//!     resp
//! }
//!
//! let app = Router::new().layer(from_fn(tag));
//! ```

mod auth;
mod logging;

use std::future::Future;
use std::sync::Arc;

pub use auth::{API_KEY_HEADER, ApiKeyAuth, KeyVerifier, StaticKeys};
pub use logging::logging;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// One stage of the request pipeline.
///
/// `call` receives the request and the rest of the chain. Returning without
/// calling [`Next::run`] short-circuits: nothing further down runs.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

/// The remainder of the middleware chain, ending in the router.
pub struct Next {
    router: Arc<Router>,
    depth: usize,
}

impl Next {
    pub(crate) fn new(router: Arc<Router>) -> Self {
        Self { router, depth: 0 }
    }

    /// Passes the request to the next layer, or to the router once every
    /// layer has run.
    pub fn run(self, req: Request) -> BoxFuture {
        match self.router.layers.get(self.depth).cloned() {
            Some(layer) => {
                let next = Self { router: self.router, depth: self.depth + 1 };
                layer.call(req, next)
            }
            None => self.router.route(req),
        }
    }
}

/// Adapts an `async fn(Request, Next) -> Response` into a [`Middleware`].
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    FromFn(f)
}

/// Returned by [`from_fn`].
pub struct FromFn<F>(F);

impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin((self.0)(req, next))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bytes::Bytes;
    use http::{Method, StatusCode};

    use super::*;
    use crate::response::IntoResponse;

    struct Record {
        name: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Middleware for Record {
        fn call(&self, req: Request, next: Next) -> BoxFuture {
            self.seen.lock().unwrap().push(self.name);
            next.run(req)
        }
    }

    async fn deny(_req: Request, _next: Next) -> Response {
        StatusCode::FORBIDDEN.into_response()
    }

    async fn handler(_req: Request) -> &'static str { "handled" }

    fn get(uri: &str) -> http::Request<Bytes> {
        http::Request::builder().method(Method::GET).uri(uri).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn layers_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .on(Method::GET, "/", handler)
            .layer(Record { name: "first", seen: Arc::clone(&seen) })
            .layer(Record { name: "second", seen: Arc::clone(&seen) })
            .into_service();

        let resp = app.call(get("/")).await;
        assert_eq!(resp.body(), b"handled");
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn short_circuit_skips_inner_layers_and_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .on(Method::GET, "/", handler)
            .layer(from_fn(deny))
            .layer(Record { name: "inner", seen: Arc::clone(&seen) })
            .into_service();

        let resp = app.call(get("/")).await;
        assert_eq!(resp.status_code(), StatusCode::FORBIDDEN);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn layers_see_unrouted_requests() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .layer(Record { name: "outer", seen: Arc::clone(&seen) })
            .into_service();

        let resp = app.call(get("/missing")).await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(*seen.lock().unwrap(), vec!["outer"]);
    }
}
