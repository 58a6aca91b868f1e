use serde_json::json;

use super::{check_segment, parse_body, parse_id, parse_language};
use crate::domain::{Lesson, ProgressState};
use crate::error::{AcademyError, AcademyResult};
use crate::server::types::{AttemptRequest, SubmitRequest};
use crate::server::{ApiResponse, ApiState};
use crate::session::Submission;

fn find_lesson<'c>(state: &'c ApiState, segment: &str) -> AcademyResult<&'c Lesson> {
    let id = parse_id(segment, "lesson")?;
    state
        .catalog
        .get_lesson(id)
        .ok_or(AcademyError::LessonNotFound(id))
}

/// GET /api/user-progress/:uid
pub(super) fn overview(state: &ApiState, uid: &str) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    state.read_session(uid, |session| {
        let tracker = session.tracker();
        let lessons: Vec<_> = state
            .catalog
            .all_lessons()
            .into_iter()
            .map(|lesson| {
                let progress = tracker.get_progress(lesson.id);
                json!({
                    "lessonId": lesson.id,
                    "unlocked": session.is_unlocked(lesson),
                    "state": ProgressState::of(progress),
                    "progress": progress,
                })
            })
            .collect();

        Ok(ApiResponse::ok(json!({
            "uid": uid,
            "overallProgress": tracker.overall_progress(),
            "completedCount": tracker.completed_count(),
            "lessons": lessons,
        })))
    })
}

/// GET /api/user-progress/:uid/:lessonId
pub(super) fn lesson_progress(
    state: &ApiState,
    uid: &str,
    lesson_id: &str,
) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let lesson = find_lesson(state, lesson_id)?;
    state.read_session(uid, |session| {
        let progress = session.tracker().get_progress(lesson.id);
        Ok(ApiResponse::ok(json!({
            "lessonId": lesson.id,
            "unlocked": session.is_unlocked(lesson),
            "state": ProgressState::of(progress),
            "progress": progress,
        })))
    })
}

/// GET /api/user-progress/:uid/:lessonId/unlocked
pub(super) fn unlocked(
    state: &ApiState,
    uid: &str,
    lesson_id: &str,
) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let lesson = find_lesson(state, lesson_id)?;
    state.read_session(uid, |session| {
        Ok(ApiResponse::ok(json!({
            "lessonId": lesson.id,
            "unlocked": session.is_unlocked(lesson),
            "requiredLessons": lesson.required_lessons,
        })))
    })
}

/// POST /api/user-progress/:uid/:lessonId/attempt
pub(super) fn attempt(
    state: &ApiState,
    uid: &str,
    lesson_id: &str,
    body: &str,
) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let lesson_id = parse_id(lesson_id, "lesson")?;
    let request: AttemptRequest = parse_body(body)?;
    let progress = state.write_session(uid, |session| {
        session.record_attempt(&state.catalog, lesson_id, request.step)
    })?;
    Ok(ApiResponse::ok(json!({ "progress": progress })))
}

/// POST /api/user-progress/:uid/:lessonId/submit
pub(super) fn submit(
    state: &ApiState,
    uid: &str,
    lesson_id: &str,
    body: &str,
) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let lesson_id = parse_id(lesson_id, "lesson")?;
    let request: SubmitRequest = parse_body(body)?;

    let submission = match (request.code, request.answer) {
        (Some(code), None) => Submission::Code {
            code,
            language: parse_language(request.language.as_deref())?,
        },
        (None, Some(answer)) => Submission::Quiz { answer },
        _ => {
            return Err(AcademyError::malformed(
                "exactly one of code or answer is required",
            ));
        }
    };

    let outcome = state.write_session(uid, |session| {
        session.submit_with_overrides(
            &state.catalog,
            lesson_id,
            request.step,
            submission,
            request.reward,
        )
    })?;
    Ok(ApiResponse::ok(json!(outcome)))
}

/// POST /api/user-progress/:uid/:lessonId/complete
pub(super) fn complete(
    state: &ApiState,
    uid: &str,
    lesson_id: &str,
) -> AcademyResult<ApiResponse> {
    let uid = check_segment(uid, "learner id")?;
    let lesson_id = parse_id(lesson_id, "lesson")?;
    let award = state.write_session(uid, |session| {
        session.complete_lesson(&state.catalog, lesson_id)
    })?;
    Ok(ApiResponse::ok(json!({
        "lessonId": lesson_id,
        "completed": true,
        "award": award,
    })))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::server::handle;
    use crate::server::handlers::tests::state;

    #[test]
    fn test_new_learner_overview() {
        let response = handle(&state(), "GET", "/api/user-progress/u1", "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["overallProgress"], 0);
        assert_eq!(response.body["lessons"][0]["unlocked"], true);
        assert_eq!(response.body["lessons"][0]["state"]["state"], "not_started");
        assert_eq!(response.body["lessons"][1]["unlocked"], false);
    }

    #[test]
    fn test_attempt_then_read_back() {
        let state = state();
        let response = handle(
            &state,
            "POST",
            "/api/user-progress/u1/1/attempt",
            &json!({ "step": 2 }).to_string(),
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.body["progress"]["attempts"], 1);

        let response = handle(&state, "GET", "/api/user-progress/u1/1", "");
        assert_eq!(response.body["progress"]["currentStep"], 2);
        assert_eq!(response.body["state"]["state"], "in_progress");

        // persisted to the store
        let doc = state.store.get("users/u1/progress/1").unwrap().unwrap();
        assert_eq!(doc["attempts"], 1);
    }

    #[test]
    fn test_locked_lesson_is_forbidden() {
        let state = state();
        let body = json!({ "step": 1, "answer": "true" }).to_string();
        let response = handle(&state, "POST", "/api/user-progress/u1/2/submit", &body);
        assert_eq!(response.status, 403);
        assert_eq!(response.body["error"], "locked");

        let response = handle(&state, "POST", "/api/user-progress/u1/2/complete", "");
        assert_eq!(response.status, 403);

        let response = handle(&state, "GET", "/api/user-progress/u1/2/unlocked", "");
        assert_eq!(response.body["unlocked"], false);
    }

    #[test]
    fn test_submit_quiz_and_code() {
        let state = state();
        let body = json!({ "step": 1, "answer": "On validators" }).to_string();
        let response = handle(&state, "POST", "/api/user-progress/u1/1/submit", &body);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["stepAward"]["coinsAwarded"], 10);
        assert_eq!(response.body["nextStep"], 2);

        let body = json!({
            "step": 2,
            "code": "let greeting = \"Hello, Solana!\";",
            "language": "rust",
            "reward": { "coins": 3, "experience": 4 }
        })
        .to_string();
        let response = handle(&state, "POST", "/api/user-progress/u1/1/submit", &body);
        assert_eq!(response.body["stepAward"]["coinsAwarded"], 3);
        assert_eq!(response.body["progress"]["attempts"], 2);
    }

    #[test]
    fn test_submit_requires_one_payload() {
        let body = json!({ "step": 1 }).to_string();
        let response = handle(&state(), "POST", "/api/user-progress/u1/1/submit", &body);
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_complete_awards_once() {
        let state = state();
        let first = handle(&state, "POST", "/api/user-progress/u1/1/complete", "");
        assert_eq!(first.status, 200);
        assert_eq!(first.body["award"]["coinsAwarded"], 50);

        let second = handle(&state, "POST", "/api/user-progress/u1/1/complete", "");
        assert_eq!(second.status, 200);
        assert!(second.body["award"].is_null());

        let response = handle(&state, "GET", "/api/user-progress/u1/2/unlocked", "");
        assert_eq!(response.body["unlocked"], true);
    }
}
