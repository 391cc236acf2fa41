//! Health-check handler.

use serde_json::{Value, json};

use crate::{Json, Request};

/// Liveness probe. Always `200 OK` with `{"status":"ok"}`: if the process can
/// answer HTTP at all, it is alive.
pub async fn liveness(_req: Request) -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
