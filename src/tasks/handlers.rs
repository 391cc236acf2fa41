//! `/tasks` handlers. The task id travels in the `id` query parameter.

use http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::store::{SharedTaskStore, Task};
use crate::error::ApiError;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};

// A JSON `null`, whole body or field, reads as the zero value.
#[derive(Deserialize, Default)]
struct CreateTask {
    title: Option<String>,
}

#[derive(Deserialize, Default)]
struct UpdateTask {
    done: Option<bool>,
}

/// `GET /tasks` lists every task; `GET /tasks?id=N` fetches one.
///
/// An empty `id` is treated like a missing one.
pub async fn get(req: Request, store: SharedTaskStore) -> Result<Response, ApiError> {
    match req.query("id").filter(|id| !id.is_empty()) {
        None => Ok(Json(store.list().await).into_response()),
        Some(raw) => {
            let id = parse_id(&raw)?;
            let task = store.get(id).await.ok_or(ApiError::TaskNotFound)?;
            Ok(Json(task).into_response())
        }
    }
}

/// `POST /tasks` with `{"title": "..."}`.
pub async fn create(req: Request, store: SharedTaskStore) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input: Option<CreateTask> = req.json().map_err(|_| ApiError::InvalidTitle)?;
    let title = input.unwrap_or_default().title.unwrap_or_default();
    if title.is_empty() {
        return Err(ApiError::InvalidTitle);
    }

    let task = store.create(title).await;
    tracing::debug!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PATCH /tasks?id=N` with `{"done": bool}`. Replies `{"updated":true}`
/// rather than the task.
pub async fn update(req: Request, store: SharedTaskStore) -> Result<Response, ApiError> {
    let id = parse_id(req.query("id").as_deref().unwrap_or_default())?;
    if store.get(id).await.is_none() {
        return Err(ApiError::TaskNotFound);
    }

    let input: Option<UpdateTask> = req.json().map_err(|_| ApiError::BadRequest)?;
    let done = input.unwrap_or_default().done.unwrap_or(false);
    store.set_done(id, done).await.ok_or(ApiError::TaskNotFound)?;

    Ok(Json(json!({ "updated": true })).into_response())
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}
