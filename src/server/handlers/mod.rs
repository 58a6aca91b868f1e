//! Request routing
//!
//! `handle` is a pure function of state, method, path and body, so routes can
//! be exercised without a socket.

mod collections;
mod lessons;
mod progress;
mod ranch;
mod validation;

use serde::de::DeserializeOwned;
use serde_json::json;

use super::{ApiResponse, ApiState};
use crate::domain::CodeLanguage;
use crate::error::{AcademyError, AcademyResult};

/// Route one request to its handler
pub fn handle(state: &ApiState, method: &str, path: &str, body: &str) -> ApiResponse {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let result = match (method, segments.as_slice()) {
        ("GET", ["api", "health"]) => Ok(ApiResponse::ok(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "lessons": state.catalog.len(),
        }))),

        ("POST", ["api", "compile"]) => validation::compile(state, body),
        ("POST", ["api", "validate"]) => validation::validate(state, body),

        ("GET", ["api", "lessons"]) => Ok(lessons::list(state)),
        ("GET", ["api", "lessons", id]) => lessons::get(state, id),
        ("GET", ["api", "lessons", id, "steps", step]) => lessons::step(state, id, step),

        ("GET", ["api", "user-progress", uid]) => progress::overview(state, uid),
        ("GET", ["api", "user-progress", uid, lesson]) => {
            progress::lesson_progress(state, uid, lesson)
        }
        ("GET", ["api", "user-progress", uid, lesson, "unlocked"]) => {
            progress::unlocked(state, uid, lesson)
        }
        ("POST", ["api", "user-progress", uid, lesson, "attempt"]) => {
            progress::attempt(state, uid, lesson, body)
        }
        ("POST", ["api", "user-progress", uid, lesson, "submit"]) => {
            progress::submit(state, uid, lesson, body)
        }
        ("POST", ["api", "user-progress", uid, lesson, "complete"]) => {
            progress::complete(state, uid, lesson)
        }

        ("GET", ["api", "ranch", uid]) => ranch::get(state, uid),
        ("GET", ["api", "ranch", uid, "rewards"]) => ranch::rewards(state, uid),
        ("POST", ["api", "ranch", uid, "earn"]) => ranch::earn(state, uid, body),
        ("POST", ["api", "ranch", uid, "spend"]) => ranch::spend(state, uid, body),
        ("POST", ["api", "ranch", uid, "experience"]) => ranch::experience(state, uid, body),

        ("GET", ["api", kind @ ("characters" | "buildings"), uid]) => {
            collections::list(state, kind, uid)
        }
        ("POST", ["api", kind @ ("characters" | "buildings"), uid]) => {
            collections::create(state, kind, uid, body)
        }
        ("GET", ["api", kind @ ("characters" | "buildings"), uid, id]) => {
            collections::get(state, kind, uid, id)
        }
        ("PUT", ["api", kind @ ("characters" | "buildings"), uid, id]) => {
            collections::update(state, kind, uid, id, body)
        }

        _ => Ok(ApiResponse::not_found()),
    };

    result.unwrap_or_else(ApiResponse::from)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> AcademyResult<T> {
    serde_json::from_str(body).map_err(AcademyError::malformed)
}

fn parse_id(segment: &str, what: &str) -> AcademyResult<u32> {
    segment
        .parse()
        .map_err(|_| AcademyError::malformed(format!("invalid {} id: {:?}", what, segment)))
}

/// Learner and document ids become store path segments
fn check_segment<'a>(segment: &'a str, what: &str) -> AcademyResult<&'a str> {
    let valid = !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(segment)
    } else {
        Err(AcademyError::malformed(format!("invalid {}: {:?}", what, segment)))
    }
}

fn parse_language(language: Option<&str>) -> AcademyResult<CodeLanguage> {
    match language {
        None => Ok(CodeLanguage::default()),
        Some(name) => CodeLanguage::parse(name)
            .ok_or_else(|| AcademyError::malformed(format!("unsupported language: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::config::Config;
    use crate::store::{DocumentStore, MemoryStore};
    use serde_json::Value;
    use std::sync::Arc;

    pub(super) fn state() -> ApiState {
        ApiState::new(
            Arc::new(catalog::builtin().clone()),
            Arc::new(MemoryStore::new()),
            Config::default(),
        )
    }

    #[test]
    fn test_health() {
        let response = handle(&state(), "GET", "/api/health", "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["status"], "ok");
        assert_eq!(response.body["lessons"], 7);
    }

    #[test]
    fn test_unknown_route_and_method() {
        let state = state();
        assert_eq!(handle(&state, "GET", "/api/nope", "").status, 404);
        assert_eq!(handle(&state, "DELETE", "/api/lessons/1", "").status, 404);
    }

    #[test]
    fn test_bad_segments_are_malformed() {
        let state = state();
        let response = handle(&state, "GET", "/api/lessons/abc", "");
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "bad_request");

        let response = handle(&state, "GET", "/api/ranch/bad.uid", "");
        assert_eq!(response.status, 400);
    }

    /// Reads succeed, every write fails
    struct ReadOnlyStore(MemoryStore);

    impl DocumentStore for ReadOnlyStore {
        fn get(&self, path: &str) -> anyhow::Result<Option<Value>> {
            self.0.get(path)
        }

        fn set(&self, _path: &str, _doc: &Value) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }

        fn update(&self, _path: &str, _patch: &Value) -> anyhow::Result<Option<Value>> {
            anyhow::bail!("disk full")
        }

        fn list(&self, collection: &str) -> anyhow::Result<Vec<(String, Value)>> {
            self.0.list(collection)
        }
    }

    #[test]
    fn test_failed_write_keeps_cached_change() {
        let state = ApiState::new(
            Arc::new(catalog::builtin().clone()),
            Arc::new(ReadOnlyStore(MemoryStore::new())),
            Config::default(),
        );

        let response = handle(&state, "POST", "/api/ranch/u1/earn", r#"{"amount": 7}"#);
        assert_eq!(response.status, 500);
        assert_eq!(response.body["error"], "store_error");
        assert!(response.body["message"].as_str().unwrap().contains("disk full"));

        let response = handle(&state, "GET", "/api/ranch/u1", "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["coins"], 7);
    }

    #[test]
    fn test_reads_do_not_grow_session_cache() {
        let state = state();
        for uid in ["a", "b", "c"] {
            assert_eq!(handle(&state, "GET", &format!("/api/ranch/{}", uid), "").status, 200);
            assert_eq!(handle(&state, "GET", &format!("/api/user-progress/{}", uid), "").status, 200);
        }
        assert_eq!(state.cached_sessions(), 0);

        handle(&state, "POST", "/api/ranch/a/earn", r#"{"amount": 3}"#);
        assert_eq!(state.cached_sessions(), 1);

        // an uncached learner still sees persisted state
        let fresh = ApiState::new(state.catalog.clone(), state.store.clone(), Config::default());
        assert_eq!(handle(&fresh, "GET", "/api/ranch/a", "").body["coins"], 3);
        assert_eq!(fresh.cached_sessions(), 0);
    }

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language(None).unwrap(), CodeLanguage::Rust);
        assert_eq!(parse_language(Some("ts")).unwrap(), CodeLanguage::TypeScript);
        assert!(parse_language(Some("cobol")).is_err());
    }
}
