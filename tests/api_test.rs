//! HTTP API tests: routing through `handle`, plus a live server on a real socket

mod common;

use std::thread;

use serde_json::{json, Value};

use common::{api_state, temp_db, RANCH_OWNER};
use ranch_academy::config::Config;
use ranch_academy::server::{handle, ApiServer};
use ranch_academy::store::DocumentStore;

fn body(value: Value) -> String {
    value.to_string()
}

#[test]
fn test_progress_flow_persists_to_sqlite() {
    let (_dir, db_path) = temp_db();
    let state = api_state(&db_path, Config::default());

    for id in 1..=5 {
        let path = format!("/api/user-progress/rancher/{}/complete", id);
        let response = handle(&state, "POST", &path, "");
        assert_eq!(response.status, 200, "completing lesson {}", id);
    }

    let response = handle(
        &state,
        "POST",
        "/api/user-progress/rancher/6/submit",
        &body(json!({ "step": 1, "code": RANCH_OWNER, "language": "rust" })),
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["progress"]["attempts"], 1);
    assert_eq!(response.body["stepAward"]["coinsAwarded"], 10);
    assert_eq!(response.body["stepAward"]["xpAwarded"], 25);

    let doc = state.store.get("users/rancher/progress/6").unwrap().unwrap();
    assert_eq!(doc["currentStep"], 1);
    assert_eq!(doc["isCompleted"], false);

    let user = state.store.get("users/rancher").unwrap().unwrap();
    assert_eq!(user["overallProgress"], 83);
}

#[test]
fn test_error_mapping() {
    let (_dir, db_path) = temp_db();
    let state = api_state(&db_path, Config::default());

    let cases = [
        ("GET", "/api/lessons/42", "", 404),
        ("GET", "/api/lessons/1/steps/0", "", 404),
        ("POST", "/api/user-progress/u1/3/attempt", r#"{"step": 1}"#, 403),
        ("POST", "/api/user-progress/u1/1/attempt", r#"{"step": "one"}"#, 400),
        ("POST", "/api/ranch/u1/spend", r#"{"amount": -1}"#, 400),
        ("POST", "/api/compile", "", 400),
        ("GET", "/api/ranch", "", 404),
    ];

    for (method, path, request_body, status) in cases {
        let response = handle(&state, method, path, request_body);
        assert_eq!(response.status, status, "{} {}", method, path);
        assert!(response.body["error"].is_string());
    }
}

#[test]
fn test_live_server_auth_and_limits() {
    let (_dir, db_path) = temp_db();
    let mut config = Config::default();
    config.server.auth_token = "secret-token".to_string();
    config.server.max_body_bytes = 1024;

    let server = ApiServer::bind("127.0.0.1:0", api_state(&db_path, config)).unwrap();
    let base = format!("http://{}", server.local_addr().unwrap());
    let worker = server.clone();
    let serving = thread::spawn(move || worker.serve());

    // missing token
    match ureq::get(&format!("{}/api/health", base)).call() {
        Err(ureq::Error::Status(code, _)) => assert_eq!(code, 401),
        other => panic!("expected 401, got {:?}", other.map(|r| r.status())),
    }

    let health: Value = ureq::get(&format!("{}/api/health", base))
        .set("X-Ranch-Token", "secret-token")
        .call()
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(health["status"], "ok");

    let compiled: Value = ureq::post(&format!("{}/api/compile", base))
        .set("X-Ranch-Token", "secret-token")
        .send_json(json!({
            "code": RANCH_OWNER,
            "language": "rust",
            "lessonId": 6,
            "currentStep": 1,
        }))
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(compiled["success"], true);
    assert_eq!(compiled["coins"], 10);

    let oversized = "x".repeat(4096);
    match ureq::post(&format!("{}/api/validate", base))
        .set("X-Ranch-Token", "secret-token")
        .send_string(&oversized)
    {
        Err(ureq::Error::Status(code, _)) => assert_eq!(code, 413),
        other => panic!("expected 413, got {:?}", other.map(|r| r.status())),
    }

    match ureq::get(&format!("{}/api/lessons/99", base))
        .set("X-Ranch-Token", "secret-token")
        .call()
    {
        Err(ureq::Error::Status(code, response)) => {
            assert_eq!(code, 404);
            let body: Value = response.into_json().unwrap();
            assert_eq!(body["error"], "not_found");
        }
        other => panic!("expected 404, got {:?}", other.map(|r| r.status())),
    }

    server.unblock();
    serving.join().unwrap();
}
