//! Core domain types for Ranch Academy

mod lesson;
mod progress;
mod reward;
mod rule;

pub use lesson::{Badge, CodeLanguage, Difficulty, Lesson, Quiz, QuizKind, Step, StepReward};
pub use progress::{LessonProgress, ProgressState};
pub use reward::RewardRecord;
pub use rule::{RuleError, RuleKind, ValidationRule};
