//! HTTP server for the lesson API
//!
//! Listens on the configured address (default 127.0.0.1:8787) and serves:
//! - POST /api/compile, /api/validate - evaluate a submission against a step
//! - GET /api/lessons/* - catalog reads
//! - /api/user-progress/*, /api/ranch/* - learner progress and economy
//! - /api/characters/*, /api/buildings/* - plain document CRUD
//!
//! Requests are handled one at a time on the serving thread.

mod handlers;
pub mod types;

pub use handlers::handle;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use serde_json::{json, Value};
use tiny_http::{Header, Response, Server};
use tracing::{debug, error, info};

use crate::catalog::LessonCatalog;
use crate::config::Config;
use crate::error::{AcademyError, AcademyResult};
use crate::session::LearnerSession;
use crate::store::DocumentStore;

const AUTH_HEADER: &str = "X-Ranch-Token";

/// Status code and JSON body produced by a handler
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: json!({ "error": "not_found", "message": "no such route" }),
        }
    }
}

impl From<AcademyError> for ApiResponse {
    fn from(err: AcademyError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.code(), "message": err.to_string() }),
        }
    }
}

/// Catalog, store and cached learner sessions shared by all requests
pub struct ApiState {
    pub catalog: Arc<LessonCatalog>,
    pub store: Arc<dyn DocumentStore>,
    pub config: Config,
    sessions: Mutex<HashMap<String, LearnerSession>>,
}

impl ApiState {
    pub fn new(catalog: Arc<LessonCatalog>, store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            catalog,
            store,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> AcademyResult<MutexGuard<'_, HashMap<String, LearnerSession>>> {
        self.sessions
            .lock()
            .map_err(|_| AcademyError::Store(anyhow!("session cache lock poisoned")))
    }

    fn session_entry<'a>(
        &self,
        sessions: &'a mut HashMap<String, LearnerSession>,
        uid: &str,
    ) -> AcademyResult<&'a mut LearnerSession> {
        Ok(match sessions.entry(uid.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let session = LearnerSession::load(self.store.as_ref(), uid, &self.config)?;
                entry.insert(session)
            }
        })
    }

    /// Run `f` against a learner's session without persisting.
    ///
    /// Uncached learners are loaded for this call only; reads never grow the cache.
    pub fn read_session<T>(
        &self,
        uid: &str,
        f: impl FnOnce(&LearnerSession) -> AcademyResult<T>,
    ) -> AcademyResult<T> {
        let sessions = self.sessions()?;
        match sessions.get(uid) {
            Some(session) => f(session),
            None => f(&LearnerSession::load(self.store.as_ref(), uid, &self.config)?),
        }
    }

    /// Number of learners held in the session cache
    pub fn cached_sessions(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Run `f` against a learner's session, then persist it.
    ///
    /// A failed write is reported, but the cached session keeps the change.
    pub fn write_session<T>(
        &self,
        uid: &str,
        f: impl FnOnce(&mut LearnerSession) -> AcademyResult<T>,
    ) -> AcademyResult<T> {
        let mut sessions = self.sessions()?;
        let session = self.session_entry(&mut sessions, uid)?;
        let value = f(session)?;
        session.persist(self.store.as_ref())?;
        Ok(value)
    }
}

/// Blocking tiny_http server bound to the lesson API
#[derive(Clone)]
pub struct ApiServer {
    server: Arc<Server>,
    state: Arc<ApiState>,
}

impl ApiServer {
    pub fn bind(addr: &str, state: Arc<ApiState>) -> anyhow::Result<Self> {
        let server =
            Server::http(addr).map_err(|e| anyhow!("Failed to start server on {}: {}", addr, e))?;
        Ok(Self {
            server: Arc::new(server),
            state,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Make `serve` return after the request in flight
    pub fn unblock(&self) {
        self.server.unblock();
    }

    /// Serve requests until `unblock` is called
    pub fn serve(&self) {
        let auth_token = self.auth_token();
        info!(
            "[ranch:http] Server listening on http://{} (auth: {})",
            self.local_addr()
                .map_or_else(|| "?".to_string(), |a| a.to_string()),
            if auth_token.is_some() { "enabled" } else { "disabled" }
        );

        loop {
            let request = match self.server.recv() {
                Ok(request) => request,
                Err(e) => {
                    debug!("[ranch:http] Server stopped: {}", e);
                    break;
                }
            };
            self.dispatch(request, auth_token);
        }
    }

    fn auth_token(&self) -> Option<&str> {
        Some(self.state.config.server.auth_token.as_str()).filter(|t| !t.trim().is_empty())
    }

    fn dispatch(&self, mut request: tiny_http::Request, auth_token: Option<&str>) {
        let method = request.method().to_string();
        let url = request.url().to_string();
        let path = url.split('?').next().unwrap_or(url.as_str());

        if !is_authorized(&request, auth_token) {
            respond_json(request, 401, json!({ "error": "unauthorized" }));
            return;
        }

        let body = match read_request_body(&mut request, self.state.config.server.max_body_bytes) {
            Ok(body) => body,
            Err((status, value)) => {
                respond_json(request, status, value);
                return;
            }
        };

        let response = handle(&self.state, &method, path, &body);
        if response.status >= 500 {
            error!("[ranch:http] {} {} -> {}: {}", method, path, response.status, response.body);
        } else {
            debug!("[ranch:http] {} {} -> {}", method, path, response.status);
        }
        respond_json(request, response.status, response.body);
    }
}

fn is_authorized(request: &tiny_http::Request, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(AUTH_HEADER))
        .is_some_and(|h| h.value.as_str() == expected)
}

fn json_content_type() -> Option<Header> {
    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).ok()
}

fn read_request_body(
    request: &mut tiny_http::Request,
    max_bytes: usize,
) -> Result<String, (u16, Value)> {
    let mut body = String::new();
    let mut reader = request.as_reader().take((max_bytes + 1) as u64);
    if let Err(e) = reader.read_to_string(&mut body) {
        error!("[ranch:http] Failed to read body: {}", e);
        return Err((400, json!({ "error": "bad_request", "message": e.to_string() })));
    }

    if body.len() > max_bytes {
        return Err((413, json!({ "error": "payload_too_large" })));
    }

    Ok(body)
}

fn respond_json(request: tiny_http::Request, status_code: u16, value: Value) {
    let body =
        serde_json::to_string(&value).unwrap_or_else(|_| "{\"error\":\"serialize\"}".to_string());
    let mut response = Response::from_string(body).with_status_code(status_code);
    if let Some(header) = json_content_type() {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}
