use serde_json::json;

use super::parse_id;
use crate::domain::CodeLanguage;
use crate::error::{AcademyError, AcademyResult};
use crate::server::types::{LessonSummary, StarterCode, StepView};
use crate::server::{ApiResponse, ApiState};

pub(super) fn list(state: &ApiState) -> ApiResponse {
    let lessons: Vec<LessonSummary> = state
        .catalog
        .all_lessons()
        .into_iter()
        .map(LessonSummary::from)
        .collect();
    ApiResponse::ok(json!({ "lessons": lessons }))
}

pub(super) fn get(state: &ApiState, id: &str) -> AcademyResult<ApiResponse> {
    let id = parse_id(id, "lesson")?;
    let lesson = state
        .catalog
        .get_lesson(id)
        .ok_or(AcademyError::LessonNotFound(id))?;
    Ok(ApiResponse::ok(json!(lesson)))
}

pub(super) fn step(state: &ApiState, id: &str, step: &str) -> AcademyResult<ApiResponse> {
    let lesson_id = parse_id(id, "lesson")?;
    let step_id = parse_id(step, "step")?;
    let lesson = state
        .catalog
        .get_lesson(lesson_id)
        .ok_or(AcademyError::LessonNotFound(lesson_id))?;
    let step = lesson.step(step_id).ok_or(AcademyError::StepNotFound {
        lesson: lesson_id,
        step: step_id,
    })?;

    let key = step.starter_code.as_str();
    let view = StepView {
        lesson_id,
        step,
        starter_code: StarterCode {
            rust: state.catalog.starter_code(key, CodeLanguage::Rust),
            typescript: state.catalog.starter_code(key, CodeLanguage::TypeScript),
        },
        next_step: lesson.next_step(step_id).map(|s| s.id),
    };
    Ok(ApiResponse::ok(json!(view)))
}

#[cfg(test)]
mod tests {
    use crate::server::handle;
    use crate::server::handlers::tests::state;

    #[test]
    fn test_list_is_ordered_summaries() {
        let response = handle(&state(), "GET", "/api/lessons", "");
        let lessons = response.body["lessons"].as_array().unwrap();
        assert_eq!(lessons.len(), 7);
        assert_eq!(lessons[0]["id"], 1);
        assert_eq!(lessons[0]["stepCount"], 3);
        assert!(lessons[0].get("steps").is_none());
    }

    #[test]
    fn test_get_lesson_and_missing_lesson() {
        let state = state();
        let response = handle(&state, "GET", "/api/lessons/6", "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["title"], "Building the Ranch Account");
        assert_eq!(response.body["requiredLessons"][0], 5);

        let response = handle(&state, "GET", "/api/lessons/99", "");
        assert_eq!(response.status, 404);
        assert_eq!(response.body["error"], "not_found");
    }

    #[test]
    fn test_step_view_resolves_starter_code() {
        let response = handle(&state(), "GET", "/api/lessons/6/steps/1", "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body["nextStep"], 2);
        assert!(response.body["starterCode"]["rust"].as_str().unwrap().contains("Ranch"));
        assert!(response.body["starterCode"]["typescript"].is_string());

        let response = handle(&state(), "GET", "/api/lessons/6/steps/9", "");
        assert_eq!(response.status, 404);
    }
}
