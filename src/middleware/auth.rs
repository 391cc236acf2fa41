//! Shared-secret API-key authentication.

use std::collections::HashSet;
use std::sync::Arc;

use http::StatusCode;
use tracing::debug;

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::IntoResponse;

/// Header carrying the client's key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Decides whether a presented key is acceptable.
pub trait KeyVerifier: Send + Sync + 'static {
    fn verify(&self, key: &str) -> bool;
}

/// A fixed set of accepted keys, usually loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticKeys(HashSet<String>);

impl StaticKeys {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }
}

impl KeyVerifier for StaticKeys {
    fn verify(&self, key: &str) -> bool {
        self.0.contains(key)
    }
}

/// Rejects requests whose `X-API-KEY` header the verifier does not accept.
///
/// A rejected request gets `401` with a plain-text `Unauthorized` body and
/// never reaches the router.
#[derive(Clone)]
pub struct ApiKeyAuth {
    verifier: Arc<dyn KeyVerifier>,
}

impl ApiKeyAuth {
    pub fn new(verifier: impl KeyVerifier) -> Self {
        Self { verifier: Arc::new(verifier) }
    }
}

impl Middleware for ApiKeyAuth {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let authorized = req
            .header(API_KEY_HEADER)
            .is_some_and(|key| self.verifier.verify(key));

        if authorized {
            return next.run(req);
        }

        debug!(path = req.path(), "rejected request without a valid api key");
        Box::pin(std::future::ready(
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Method;

    use super::*;
    use crate::Router;

    async fn secret(_req: Request) -> &'static str { "secret" }

    fn app() -> crate::Service {
        Router::new()
            .on(Method::GET, "/users", secret)
            .layer(ApiKeyAuth::new(StaticKeys::new(["12345", "67890"])))
            .into_service()
    }

    fn get(key: Option<&str>) -> http::Request<Bytes> {
        let mut builder = http::Request::builder().method(Method::GET).uri("/users");
        if let Some(key) = key {
            builder = builder.header("X-API-KEY", key);
        }
        builder.body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn accepts_any_configured_key() {
        for key in ["12345", "67890"] {
            let resp = app().call(get(Some(key))).await;
            assert_eq!(resp.status_code(), StatusCode::OK);
            assert_eq!(resp.body(), b"secret");
        }
    }

    #[tokio::test]
    async fn rejects_missing_key() {
        let resp = app().call(get(None)).await;
        assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.body(), b"Unauthorized");
    }

    #[tokio::test]
    async fn rejects_wrong_key() {
        let resp = app().call(get(Some("1234"))).await;
        assert_eq!(resp.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn empty_key_set_accepts_nothing() {
        assert!(!StaticKeys::default().verify(""));
    }
}
