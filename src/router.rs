//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler.
//!
//! # Unmatched requests
//!
//! When no tree for the request's method matches the path, the router checks
//! the other methods' trees. A hit there means the path exists but not for
//! this method, and the answer is `405 Method Not Allowed`. Otherwise it is
//! `404 Not Found`. Both are sent with an empty body.
//!
//! # Layers
//!
//! Middleware layers wrap the whole routing step, so they also see requests
//! that end in 404 or 405. A request travels:
//!
//! ```text
//! Service::call(req)
//!        ↓
//! layer 0 → layer 1 → … → layer n     ← registration order
//!        ↓
//! Router::route(req)                  ← lookup, params, handler
//! ```
//!
//! Any layer may answer by itself without calling the next one; the
//! API-key check does exactly that.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Router ────────────────────────────────────────────────────────────────────

/// The application router.
///
/// Build it once at startup, then hand it to [`Server::serve`](crate::Server::serve)
/// or turn it into a [`Service`] to drive it directly.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    pub(crate) layers: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), layers: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use crudsvc::{Request, Response, Router};
    /// # use http::Method;
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// # async fn delete_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::DELETE, "/users/{id}", delete_user)
    ///     .on(Method::GET,    "/users/{id}", get_user)
    ///     .on(Method::POST,   "/users",      create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the path template is invalid or conflicts with a route
    /// already registered for the same method.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Wrap every request in `middleware`.
    ///
    /// Layers run in registration order: the first one registered sees the
    /// request first and the response last.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    pub fn into_service(self) -> Service {
        Service(Arc::new(self))
    }

    /// Innermost step of the chain: resolve the route and run its handler.
    pub(crate) fn route(&self, mut req: Request) -> BoxFuture {
        match self.lookup(req.method(), req.path()) {
            Ok((handler, params)) => {
                req.params = params;
                handler.call(req)
            }
            Err(status) => Box::pin(std::future::ready(status.into_response())),
        }
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<(BoxedHandler, HashMap<String, String>), StatusCode> {
        if let Some(matched) = self.routes.get(method).and_then(|tree| tree.at(path).ok()) {
            let handler = Arc::clone(matched.value);
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Ok((handler, params));
        }

        if self.routes.values().any(|tree| tree.at(path).is_ok()) {
            Err(StatusCode::METHOD_NOT_ALLOWED)
        } else {
            Err(StatusCode::NOT_FOUND)
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── Service ───────────────────────────────────────────────────────────────────

/// A finished, shareable router: middleware plus routes.
///
/// Cloning is one `Arc` increment. [`Service::call`] runs one request through
/// the full chain without any network I/O, which is what the tests use.
#[derive(Clone)]
pub struct Service(pub(crate) Arc<Router>);

impl Service {
    pub async fn call(&self, req: impl Into<Request>) -> Response {
        Next::new(Arc::clone(&self.0)).run(req.into()).await
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    async fn ok(_req: Request) -> &'static str { "ok" }

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or_default().to_owned()
    }

    fn request(method: Method, uri: &str) -> http::Request<Bytes> {
        http::Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap()
    }

    fn app() -> Service {
        Router::new()
            .on(Method::GET, "/users", ok)
            .on(Method::GET, "/users/{id}", echo_id)
            .on(Method::DELETE, "/users/{id}", ok)
            .into_service()
    }

    #[tokio::test]
    async fn path_parameters_reach_handler() {
        let resp = app().call(request(Method::GET, "/users/42")).await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        assert_eq!(resp.body(), b"42");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let resp = app().call(request(Method::GET, "/nope")).await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn known_path_wrong_method_is_not_allowed() {
        let resp = app().call(request(Method::PATCH, "/users/42")).await;
        assert_eq!(resp.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let _ = Router::new()
            .on(Method::GET, "/users/{id}", ok)
            .on(Method::GET, "/users/{name}", ok);
    }
}
