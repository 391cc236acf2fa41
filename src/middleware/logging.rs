//! Request logging.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use super::Next;
use crate::request::Request;
use crate::response::Response;

/// Logs every request, then passes it on unchanged.
///
/// Register it before any layer that can reject a request so rejected
/// attempts are logged too. Wrap with [`from_fn`](super::from_fn).
pub async fn logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.path().to_owned();
    let started = Instant::now();

    info!(
        timestamp = %Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        %method,
        %path,
        "request"
    );

    let resp = next.run(req).await;

    info!(
        %method,
        %path,
        status = resp.status_code().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "response"
    );
    resp
}
