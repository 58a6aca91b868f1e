//! Plain CRUD over per-learner document collections (characters, buildings)

use serde_json::{json, Map, Value};
use tracing::debug;

use super::check_segment;
use crate::error::{AcademyError, AcademyResult};
use crate::server::{ApiResponse, ApiState};
use crate::store::{doc_id, paths};

fn parse_object(body: &str) -> AcademyResult<Map<String, Value>> {
    match serde_json::from_str(body).map_err(AcademyError::malformed)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(AcademyError::malformed("expected a JSON object")),
    }
}

fn with_id(id: &str, mut doc: Value) -> Value {
    if let Some(fields) = doc.as_object_mut() {
        fields.insert("id".to_string(), json!(id));
    }
    doc
}

/// GET /api/{kind}/:uid
pub(super) fn list(state: &ApiState, kind: &str, uid: &str) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let items: Vec<Value> = state
        .store
        .list(&paths::collection(uid, kind))?
        .into_iter()
        .map(|(path, doc)| with_id(doc_id(&path), doc))
        .collect();
    let mut body = Map::new();
    body.insert(kind.to_string(), Value::Array(items));
    Ok(ApiResponse::ok(Value::Object(body)))
}

/// POST /api/{kind}/:uid
///
/// Uses the body's `id` when present, otherwise assigns a fresh one.
pub(super) fn create(
    state: &ApiState,
    kind: &str,
    uid: &str,
    body: &str,
) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let mut fields = parse_object(body)?;

    let id = match fields.remove("id") {
        Some(Value::String(id)) => check_segment(&id, "document id")?.to_string(),
        Some(_) => return Err(AcademyError::malformed("id must be a string")),
        None => uuid::Uuid::new_v4().to_string(),
    };

    let doc = Value::Object(fields);
    state.store.set(&paths::document(uid, kind, &id), &doc)?;
    debug!("[ranch:store] Created {}/{} for {}", kind, id, uid);
    Ok(ApiResponse::created(with_id(&id, doc)))
}

/// GET /api/{kind}/:uid/:id
pub(super) fn get(
    state: &ApiState,
    kind: &str,
    uid: &str,
    id: &str,
) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let id = check_segment(id, "document id")?;
    let path = paths::document(uid, kind, id);
    let doc = state
        .store
        .get(&path)?
        .ok_or(AcademyError::DocumentNotFound(path))?;
    Ok(ApiResponse::ok(with_id(id, doc)))
}

/// PUT /api/{kind}/:uid/:id
///
/// Shallow-merges the body into an existing document.
pub(super) fn update(
    state: &ApiState,
    kind: &str,
    uid: &str,
    id: &str,
    body: &str,
) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let id = check_segment(id, "document id")?;
    let mut fields = parse_object(body)?;
    fields.remove("id");

    let path = paths::document(uid, kind, id);
    let doc = state
        .store
        .update(&path, &Value::Object(fields))?
        .ok_or(AcademyError::DocumentNotFound(path))?;
    Ok(ApiResponse::ok(with_id(id, doc)))
}
