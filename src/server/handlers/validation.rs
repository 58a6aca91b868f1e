use std::fmt::Write as _;

use serde_json::json;

use super::{parse_body, parse_language};
use crate::domain::{CodeLanguage, Lesson, Step};
use crate::error::{AcademyError, AcademyResult};
use crate::rewards::RewardDispatcher;
use crate::server::types::{CompileRequest, CompileResponse, ValidateRequest, ValidateResponse};
use crate::server::{ApiResponse, ApiState};
use crate::validation::{self as evaluator, ValidationResult};

fn code_step<'c>(
    state: &'c ApiState,
    lesson_id: u32,
    step_id: u32,
) -> AcademyResult<(&'c Lesson, &'c Step)> {
    let lesson = state
        .catalog
        .get_lesson(lesson_id)
        .ok_or(AcademyError::LessonNotFound(lesson_id))?;
    let step = lesson.step(step_id).ok_or(AcademyError::StepNotFound {
        lesson: lesson_id,
        step: step_id,
    })?;
    if !step.requires_code {
        return Err(AcademyError::malformed(format!(
            "step {}.{} is answered with a quiz, not code",
            lesson_id, step_id
        )));
    }
    Ok((lesson, step))
}

/// Simulated compiler transcript for a checked submission
fn build_log(
    lesson: &Lesson,
    step: &Step,
    language: CodeLanguage,
    result: &ValidationResult,
) -> String {
    let mut out = String::new();
    let command = match language {
        CodeLanguage::Rust => "anchor build",
        CodeLanguage::TypeScript => "tsc --noEmit",
    };
    let _ = writeln!(out, "$ {}", command);
    let _ = writeln!(
        out,
        "   Compiling lesson-{} step {} ({})",
        lesson.id, step.id, language
    );
    for rule in &result.results {
        let mark = if rule.passed {
            "ok"
        } else if rule.rule.required {
            "FAILED"
        } else {
            "skipped"
        };
        let _ = writeln!(out, "   check {} ... {}", rule.message, mark);
    }
    let status = if result.success { "Finished" } else { "error" };
    let _ = write!(
        out,
        "{}: {}/{} checks passed",
        status,
        result.passed_count(),
        result.results.len()
    );
    out
}

/// POST /api/compile
pub(super) fn compile(state: &ApiState, body: &str) -> AcademyResult<ApiResponse> {
    let request: CompileRequest = parse_body(body)?;
    let language = parse_language(request.language.as_deref())?;
    let (lesson, step) = code_step(state, request.lesson_id, request.current_step)?;

    let result = evaluator::validate(&request.code, &step.rules_for(language));
    let output = build_log(lesson, step, language, &result);

    let response = if result.success {
        let amounts = RewardDispatcher::new(state.config.rewards).step_amounts(step, None);
        CompileResponse {
            success: true,
            message: step.success_message.clone(),
            output,
            experience: Some(amounts.experience),
            coins: Some(amounts.coins),
            errors: None,
        }
    } else {
        CompileResponse {
            success: false,
            message: step.failure_message.clone(),
            output,
            experience: None,
            coins: None,
            errors: Some(result.errors),
        }
    };
    Ok(ApiResponse::ok(json!(response)))
}

/// POST /api/validate
pub(super) fn validate(state: &ApiState, body: &str) -> AcademyResult<ApiResponse> {
    let request: ValidateRequest = parse_body(body)?;

    let (result, success_message, failure_message) = match request.rules {
        Some(rules) => (
            evaluator::validate(&request.code, &rules),
            "All checks passed".to_string(),
            "Some checks failed".to_string(),
        ),
        None => {
            let (Some(lesson_id), Some(step_id)) = (request.lesson_id, request.current_step) else {
                return Err(AcademyError::malformed(
                    "either rules or lessonId and currentStep are required",
                ));
            };
            let language = parse_language(request.language.as_deref())?;
            let (_, step) = code_step(state, lesson_id, step_id)?;
            (
                evaluator::validate(&request.code, &step.rules_for(language)),
                step.success_message.clone(),
                step.failure_message.clone(),
            )
        }
    };

    let response = ValidateResponse {
        success: result.success,
        message: if result.success { success_message } else { failure_message },
        results: result.results,
        errors: result.errors,
    };
    Ok(ApiResponse::ok(json!(response)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::server::handle;
    use crate::server::handlers::tests::state;

    const RANCH: &str = "pub struct Ranch {\n    pub owner: Pubkey,\n}";

    #[test]
    fn test_compile_success_reports_step_amounts() {
        let body = json!({
            "code": RANCH,
            "language": "rust",
            "lessonId": 6,
            "currentStep": 1,
        });
        let response = handle(&state(), "POST", "/api/compile", &body.to_string());

        assert_eq!(response.status, 200);
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["coins"], 10);
        assert_eq!(response.body["experience"], 25);
        assert!(response.body.get("errors").is_none());
        assert!(response.body["output"].as_str().unwrap().starts_with("$ anchor build"));
    }

    #[test]
    fn test_compile_failure_lists_errors() {
        let body = json!({
            "code": "pub struct Ranch {}",
            "lessonId": 6,
            "currentStep": 1,
        });
        let response = handle(&state(), "POST", "/api/compile", &body.to_string());

        assert_eq!(response.status, 200);
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["message"], "The ranch needs an owner field.");
        assert_eq!(response.body["errors"][0], "The ranch needs an owner field.");
        assert!(response.body.get("coins").is_none());
    }

    #[test]
    fn test_compile_typescript_pattern() {
        let body = json!({
            "code": "interface Ranch { owner: PublicKey }",
            "language": "typescript",
            "lessonId": 6,
            "currentStep": 1,
        });
        let response = handle(&state(), "POST", "/api/compile", &body.to_string());
        assert_eq!(response.body["success"], true);
    }

    #[test]
    fn test_compile_step_override_amounts() {
        let body = json!({
            "code": "fn build_barn() { require!(ranch.coins >= 10); ranch.coins -= 10; }",
            "lessonId": 6,
            "currentStep": 3,
        });
        let response = handle(&state(), "POST", "/api/compile", &body.to_string());
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["coins"], 25);
        assert_eq!(response.body["experience"], 50);
    }

    #[test]
    fn test_validate_returns_raw_results() {
        let body = json!({ "code": RANCH, "lessonId": 6, "currentStep": 1 });
        let response = handle(&state(), "POST", "/api/validate", &body.to_string());

        assert_eq!(response.status, 200);
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["results"][0]["passed"], true);
        assert_eq!(response.body["errors"], json!([]));
    }

    #[test]
    fn test_validate_ad_hoc_rules() {
        let body = json!({
            "code": "fn main() {}",
            "rules": [
                { "type": "function_exists", "pattern": "main", "message": "Need main" },
                { "type": "regex", "pattern": "(unclosed", "message": "Broken" },
                { "type": "contains", "pattern": "println!", "message": "Print", "required": false }
            ]
        });
        let response = handle(&state(), "POST", "/api/validate", &body.to_string());

        assert_eq!(response.body["success"], false);
        let errors = response.body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].as_str().unwrap().contains("invalid pattern"));
    }

    #[test]
    fn test_malformed_and_missing_steps() {
        let state = state();
        let response = handle(&state, "POST", "/api/validate", "{not json");
        assert_eq!(response.status, 400);

        let response = handle(&state, "POST", "/api/validate", r#"{"code": ""}"#);
        assert_eq!(response.status, 400);

        let body = json!({ "code": "", "lessonId": 6, "currentStep": 7 });
        let response = handle(&state, "POST", "/api/compile", &body.to_string());
        assert_eq!(response.status, 404);

        let body = json!({ "code": "", "lessonId": 1, "currentStep": 1 });
        let response = handle(&state, "POST", "/api/compile", &body.to_string());
        assert_eq!(response.status, 400);
    }
}
