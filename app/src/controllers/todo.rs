//! Todo controller
//!
//! Client errors (bad id, bad body, id mismatch, missing record) answer with
//! an empty body. Storage failures go through the framework's JSON error.

use kit::{HttpResponse, Request, Response};
use serde_json::{Map, Value};

use crate::models::TodoPayload;
use crate::store::TodoStore;

fn path_id(req: &Request) -> Result<i32, HttpResponse> {
    req.param_as::<i32>("id").map_err(|_| HttpResponse::empty(400))
}

/// The body must be a JSON object; arrays, scalars and `null` are rejected
fn payload(req: &Request) -> Result<TodoPayload, HttpResponse> {
    let object = req.json::<Map<String, Value>>().map_err(bad_payload)?;
    serde_json::from_value(Value::Object(object)).map_err(bad_payload)
}

fn bad_payload(error: impl std::fmt::Display) -> HttpResponse {
    tracing::debug!(error = %error, "rejected todo payload");
    HttpResponse::empty(400)
}

/// GET /api/todo
pub async fn index(req: Request) -> Response {
    let store = req.state::<TodoStore>()?;
    let items = store.list_all().await?;
    HttpResponse::json(&items)?.ok()
}

/// GET /api/todo/{id}
pub async fn show(req: Request) -> Response {
    let id = path_id(&req)?;
    let store = req.state::<TodoStore>()?;

    match store.get(id).await? {
        Some(item) => HttpResponse::json(&item)?.ok(),
        None => Err(HttpResponse::empty(404)),
    }
}

/// POST /api/todo
pub async fn store(req: Request) -> Response {
    let payload = payload(&req)?;
    let store = req.state::<TodoStore>()?;

    let item = store.insert(payload).await?;
    let id = item.id.to_string();
    let location = req
        .url_for("todo.show", &[("id", id.as_str())])
        .unwrap_or_else(|| format!("/api/todo/{}", id));

    HttpResponse::created(location, &item)?.ok()
}

/// PUT /api/todo/{id}
///
/// The body's id must equal the path id; an omitted body id counts as 0.
pub async fn update(req: Request) -> Response {
    let id = path_id(&req)?;
    let payload = payload(&req)?;

    if payload.id.unwrap_or_default() != id {
        return Err(HttpResponse::empty(400));
    }

    let store = req.state::<TodoStore>()?;
    store.replace(id, payload).await?;
    HttpResponse::no_content().ok()
}

/// DELETE /api/todo/{id}
pub async fn destroy(req: Request) -> Response {
    let id = path_id(&req)?;
    let store = req.state::<TodoStore>()?;

    store.delete(id).await?;
    HttpResponse::no_content().ok()
}
