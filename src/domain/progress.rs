use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-learner, per-lesson progress record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub lesson_id: u32,
    /// 1-based step the learner last attempted
    pub current_step: u32,
    pub is_completed: bool,
    pub attempts: u32,
    pub last_attempt_at: DateTime<Utc>,
    /// Set once, on the first transition to completed
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Lifecycle view of a progress record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ProgressState {
    NotStarted,
    InProgress { current_step: u32, attempts: u32 },
    Completed { completed_at: DateTime<Utc> },
}

impl LessonProgress {
    pub fn started(lesson_id: u32, step: u32, now: DateTime<Utc>) -> Self {
        Self {
            lesson_id,
            current_step: step,
            is_completed: false,
            attempts: 1,
            last_attempt_at: now,
            completed_at: None,
        }
    }

    pub fn state(&self) -> ProgressState {
        match self.completed_at {
            Some(completed_at) if self.is_completed => ProgressState::Completed { completed_at },
            _ => ProgressState::InProgress {
                current_step: self.current_step,
                attempts: self.attempts,
            },
        }
    }
}

impl ProgressState {
    pub fn of(progress: Option<&LessonProgress>) -> Self {
        progress.map_or(Self::NotStarted, LessonProgress::state)
    }
}
