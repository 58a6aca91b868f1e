use serde_json::{json, Value};

use super::{check_segment, parse_body};
use crate::error::AcademyResult;
use crate::server::types::AmountRequest;
use crate::server::{ApiResponse, ApiState};
use crate::session::LearnerSession;

fn ranch_view(session: &LearnerSession) -> Value {
    let economy = session.economy();
    let effects: Vec<&str> = session.active_effects().iter().map(|e| e.as_str()).collect();
    json!({
        "uid": session.uid(),
        "coins": economy.coins(),
        "experience": economy.experience(),
        "level": economy.level(),
        "stats": economy.stats(),
        "activeEffects": effects,
    })
}

/// GET /api/ranch/:uid
pub(super) fn get(state: &ApiState, uid: &str) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    state.read_session(uid, |session| Ok(ApiResponse::ok(ranch_view(session))))
}

/// GET /api/ranch/:uid/rewards
pub(super) fn rewards(state: &ApiState, uid: &str) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    state.read_session(uid, |session| {
        Ok(ApiResponse::ok(json!({ "rewards": session.rewards() })))
    })
}

/// POST /api/ranch/:uid/earn
pub(super) fn earn(state: &ApiState, uid: &str, body: &str) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let request: AmountRequest = parse_body(body)?;
    state.write_session(uid, |session| {
        session.earn_ranch_coin(request.amount);
        Ok(ApiResponse::ok(ranch_view(session)))
    })
}

/// POST /api/ranch/:uid/spend
///
/// An unaffordable purchase is not an error: `success` is false and the
/// balance is unchanged.
pub(super) fn spend(state: &ApiState, uid: &str, body: &str) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let request: AmountRequest = parse_body(body)?;
    state.write_session(uid, |session| {
        let success = session.spend_ranch_coin(request.amount);
        let mut view = ranch_view(session);
        view["success"] = json!(success);
        Ok(ApiResponse::ok(view))
    })
}

/// POST /api/ranch/:uid/experience
pub(super) fn experience(state: &ApiState, uid: &str, body: &str) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let request: AmountRequest = parse_body(body)?;
    state.write_session(uid, |session| {
        let level_up = session.add_experience(request.amount);
        let mut view = ranch_view(session);
        view["levelUp"] = json!(level_up);
        Ok(ApiResponse::ok(view))
    })
}
