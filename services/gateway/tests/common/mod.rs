//! A fake REST backend served by axum on an ephemeral port.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct Backend {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    failures: Mutex<HashMap<String, (u16, String)>>,
    replies: Mutex<HashMap<String, Value>>,
    pub authorization: Mutex<Vec<Option<String>>>,
    next_id: AtomicU64,
}

impl Backend {
    pub fn rows(&self, resource: &str) -> Vec<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn seed(&self, resource: &str, row: Value) {
        self.collections
            .lock()
            .unwrap()
            .entry(resource.to_string())
            .or_default()
            .push(row);
    }

    /// Every request on `resource` answers `status` with `body` until cleared.
    pub fn fail(&self, resource: &str, status: u16, body: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(resource.to_string(), (status, body.to_string()));
    }

    pub fn heal(&self, resource: &str) {
        self.failures.lock().unwrap().remove(resource);
    }

    /// The `action` transition still applies its change but answers 200 with
    /// `body` instead of its usual reply.
    pub fn reply_to(&self, action: &str, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(action.to_string(), body);
    }

    fn failure(&self, resource: &str) -> Option<Response> {
        self.failures
            .lock()
            .unwrap()
            .get(resource)
            .map(|(status, body)| {
                (StatusCode::from_u16(*status).unwrap(), body.clone()).into_response()
            })
    }

    fn record(&self, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorization.lock().unwrap().push(auth);
    }
}

fn id_of(row: &Value) -> String {
    match &row["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn not_found(resource: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{} {} introuvable", resource, id) })),
    )
        .into_response()
}

async fn list(
    State(backend): State<Arc<Backend>>,
    Path(resource): Path<String>,
    headers: HeaderMap,
) -> Response {
    backend.record(&headers);
    if let Some(failure) = backend.failure(&resource) {
        return failure;
    }
    Json(backend.rows(&resource)).into_response()
}

async fn create(
    State(backend): State<Arc<Backend>>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    backend.record(&headers);
    if let Some(failure) = backend.failure(&resource) {
        return failure;
    }
    body["id"] = json!(backend.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    backend.seed(&resource, body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update(
    State(backend): State<Arc<Backend>>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(patch): Json<Value>,
) -> Response {
    backend.record(&headers);
    if let Some(failure) = backend.failure(&resource) {
        return failure;
    }
    let mut collections = backend.collections.lock().unwrap();
    let row = collections
        .get_mut(&resource)
        .and_then(|rows| rows.iter_mut().find(|r| id_of(r) == id));
    match (row, patch.as_object()) {
        (Some(row), Some(changes)) => {
            for (key, value) in changes {
                row[key] = value.clone();
            }
            Json(row.clone()).into_response()
        }
        (Some(_), None) => StatusCode::BAD_REQUEST.into_response(),
        (None, _) => not_found(&resource, &id),
    }
}

/// Clients answer 200 with an empty body, everything else 204.
async fn remove(
    State(backend): State<Arc<Backend>>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    backend.record(&headers);
    if let Some(failure) = backend.failure(&resource) {
        return failure;
    }
    let mut collections = backend.collections.lock().unwrap();
    let rows = collections.entry(resource.clone()).or_default();
    let before = rows.len();
    rows.retain(|r| id_of(r) != id);
    if rows.len() == before {
        return not_found(&resource, &id);
    }
    if resource == "clients" {
        StatusCode::OK.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Incident and user transitions answer 204; intervention transitions echo
/// the updated row.
async fn transition(
    State(backend): State<Arc<Backend>>,
    Path((resource, id, action)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    backend.record(&headers);
    if let Some(failure) = backend.failure(&resource) {
        return failure;
    }
    let reply = backend.replies.lock().unwrap().get(&action).cloned();
    let now = chrono::Utc::now().to_rfc3339();
    let mut collections = backend.collections.lock().unwrap();
    let Some(row) = collections
        .get_mut(&resource)
        .and_then(|rows| rows.iter_mut().find(|r| id_of(r) == id))
    else {
        return not_found(&resource, &id);
    };
    let response = match (resource.as_str(), action.as_str()) {
        ("incidents", "resolve") => {
            row["statut"] = json!("résolu");
            row["date_resolu"] = json!(now);
            StatusCode::NO_CONTENT.into_response()
        }
        ("utilisateurs", "statut") => {
            let next = if row["statut"] == "actif" { "inactif" } else { "actif" };
            row["statut"] = json!(next);
            StatusCode::NO_CONTENT.into_response()
        }
        ("interventions", "start") => {
            row["statut"] = json!("en cours");
            row["startedAt"] = json!(now);
            Json(row.clone()).into_response()
        }
        ("interventions", "finish") => {
            if row.get("startedAt").map_or(true, Value::is_null) {
                row["startedAt"] = json!(now);
            }
            row["statut"] = json!("terminée");
            row["endedAt"] = json!(now);
            Json(row.clone()).into_response()
        }
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    match reply {
        Some(body) => Json(body).into_response(),
        None => response,
    }
}

pub fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/{resource}", get(list).post(create))
        .route("/{resource}/{id}", put(update).delete(remove))
        .route("/{resource}/{id}/{action}", patch(transition))
        .with_state(backend)
}

/// Serves the backend and returns its base URL.
pub async fn spawn(backend: Arc<Backend>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(backend)).await.unwrap();
    });
    format!("http://{}", addr)
}
