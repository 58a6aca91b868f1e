//! Request and response bodies for the lesson API

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, Lesson, Step, StepReward, ValidationRule};
use crate::validation::RuleResult;

/// POST /api/compile
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub code: String,
    /// Defaults to rust when omitted
    pub language: Option<String>,
    pub lesson_id: u32,
    pub current_step: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompileResponse {
    pub success: bool,
    pub message: String,
    /// Simulated build log
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coins: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// POST /api/validate
///
/// Either a lesson step or an ad-hoc rule list must be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub code: String,
    pub language: Option<String>,
    pub lesson_id: Option<u32>,
    pub current_step: Option<u32>,
    pub rules: Option<Vec<ValidationRule>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<RuleResult>,
    pub errors: Vec<String>,
}

/// POST /api/user-progress/:uid/:lessonId/attempt
#[derive(Debug, Clone, Deserialize)]
pub struct AttemptRequest {
    pub step: u32,
}

/// POST /api/user-progress/:uid/:lessonId/submit
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub step: u32,
    pub code: Option<String>,
    pub language: Option<String>,
    pub answer: Option<String>,
    /// Replaces the step's coin and experience amounts
    pub reward: Option<StepReward>,
}

/// POST /api/ranch/:uid/{earn,spend,experience}
#[derive(Debug, Clone, Deserialize)]
pub struct AmountRequest {
    pub amount: u64,
}

/// Catalog listing entry, without step contents
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub chapter: u32,
    pub difficulty: Difficulty,
    pub estimated_minutes: u32,
    pub premium: bool,
    pub reward: u64,
    pub step_count: u32,
    pub required_lessons: Vec<u32>,
}

impl From<&Lesson> for LessonSummary {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            chapter: lesson.chapter,
            difficulty: lesson.difficulty,
            estimated_minutes: lesson.estimated_minutes,
            premium: lesson.premium,
            reward: lesson.reward,
            step_count: lesson.step_count(),
            required_lessons: lesson.required_lessons.clone(),
        }
    }
}

/// A step with its starter code resolved for each language
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView<'a> {
    pub lesson_id: u32,
    pub step: &'a Step,
    pub starter_code: StarterCode<'a>,
    pub next_step: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StarterCode<'a> {
    pub rust: Option<&'a str>,
    pub typescript: Option<&'a str>,
}
