//! Handlers for the persisted user service.

use http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use super::repository::{SharedUserRepository, User};
use crate::error::ApiError;
use crate::{Json, Request};

#[derive(Deserialize, Default)]
struct CreateUser {
    name: Option<String>,
}

pub async fn list(_req: Request, repo: SharedUserRepository) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(repo.list().await?))
}

/// A body without `name`, or with `"name": null`, inserts an empty name.
pub async fn create(req: Request, repo: SharedUserRepository) -> Result<Json<User>, ApiError> {
    let input: Option<CreateUser> = req.json().map_err(|e| {
        warn!("rejected user body: {e}");
        ApiError::InvalidBody
    })?;
    let name = input.unwrap_or_default().name.unwrap_or_default();
    Ok(Json(repo.create(&name).await?))
}

/// Deletes unconditionally and answers in plain text.
pub async fn delete(req: Request, repo: SharedUserRepository) -> Result<&'static str, ApiError> {
    let id = req
        .param("id")
        .and_then(|raw| raw.parse::<i32>().ok())
        .ok_or(ApiError::InvalidId)?;
    repo.delete(id).await?;
    Ok("User deleted")
}

/// Readiness: `200` when the database answers, `503` otherwise.
pub async fn health(_req: Request, repo: SharedUserRepository) -> (StatusCode, Json<Value>) {
    match repo.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            warn!("health check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unavailable" })))
        }
    }
}
