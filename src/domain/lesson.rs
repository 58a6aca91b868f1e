use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rule::ValidationRule;

/// Lesson difficulty tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source language a learner writes a submission in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    /// Anchor / native Rust programs
    Rust,
    /// Client-side scripts
    TypeScript,
}

impl CodeLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::TypeScript => "typescript",
        }
    }

    /// Parse a language name, accepting the common short forms
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rust" | "rs" => Some(Self::Rust),
            "typescript" | "ts" | "javascript" | "js" => Some(Self::TypeScript),
            _ => None,
        }
    }
}

impl Default for CodeLanguage {
    fn default() -> Self {
        Self::Rust
    }
}

impl std::fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of quiz attached to a narrative step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// Quiz descriptor for steps that are acknowledged rather than coded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "type")]
    pub kind: QuizKind,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Quiz {
    pub fn multiple_choice(question: &str, options: &[&str], correct: &str) -> Self {
        Self {
            kind: QuizKind::MultipleChoice,
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct.to_string(),
        }
    }

    pub fn true_false(question: &str, correct: bool) -> Self {
        Self {
            kind: QuizKind::TrueFalse,
            question: question.to_string(),
            options: vec!["true".to_string(), "false".to_string()],
            correct_answer: correct.to_string(),
        }
    }

    /// Answers are compared after trimming; case matters
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim() == self.correct_answer.trim()
    }
}

/// Explicit coin/xp amounts that replace the default step award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReward {
    pub coins: u64,
    pub experience: u64,
}

/// NFT badge graphic granted when a lesson is completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub image: String,
}

/// One unit of lesson content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// 1-based, sequential within the owning lesson
    pub id: u32,
    pub title: String,
    pub challenge: String,
    /// Single-regex convention: one expected pattern per language
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expected_code: BTreeMap<CodeLanguage, String>,
    /// Structured convention; takes precedence over `expected_code`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ValidationRule>,
    pub success_message: String,
    pub failure_message: String,
    pub starter_code: String,
    #[serde(default)]
    pub hint: Option<String>,
    pub requires_code: bool,
    #[serde(default)]
    pub quiz: Option<Quiz>,
    /// Presentation trigger, e.g. "network_ping"
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub reward: Option<StepReward>,
}

impl Step {
    /// A step that expects a code submission
    pub fn code(id: u32, title: &str, challenge: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            challenge: challenge.to_string(),
            expected_code: BTreeMap::new(),
            rules: Vec::new(),
            success_message: "Nice work, partner!".to_string(),
            failure_message: "Not quite. Check the challenge and try again.".to_string(),
            starter_code: String::new(),
            hint: None,
            requires_code: true,
            quiz: None,
            effect: None,
            reward: None,
        }
    }

    /// A narrative step acknowledged through a quiz
    pub fn narrative(id: u32, title: &str, challenge: &str, quiz: Quiz) -> Self {
        Self {
            requires_code: false,
            quiz: Some(quiz),
            ..Self::code(id, title, challenge)
        }
    }

    pub fn expect(mut self, language: CodeLanguage, pattern: &str) -> Self {
        self.expected_code.insert(language, pattern.to_string());
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn messages(mut self, success: &str, failure: &str) -> Self {
        self.success_message = success.to_string();
        self.failure_message = failure.to_string();
        self
    }

    pub fn starter(mut self, key: &str) -> Self {
        self.starter_code = key.to_string();
        self
    }

    pub fn hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    pub fn effect(mut self, tag: &str) -> Self {
        self.effect = Some(tag.to_string());
        self
    }

    pub fn reward(mut self, coins: u64, experience: u64) -> Self {
        self.reward = Some(StepReward { coins, experience });
        self
    }

    /// Effective rules for a submission in `language`.
    ///
    /// Structured rules win. Otherwise the expected pattern for the language
    /// (falling back to the first pattern the step defines) becomes a single
    /// required regex rule carrying the step's failure message.
    pub fn rules_for(&self, language: CodeLanguage) -> Vec<ValidationRule> {
        if !self.rules.is_empty() {
            return self.rules.clone();
        }

        let pattern = self
            .expected_code
            .get(&language)
            .or_else(|| self.expected_code.values().next());

        match pattern {
            Some(pattern) => vec![ValidationRule {
                kind: super::RuleKind::Regex,
                pattern: pattern.clone(),
                message: self.failure_message.clone(),
                required: true,
            }],
            None => Vec::new(),
        }
    }

    /// All rules the step can produce, for authoring-time checks
    pub fn all_rules(&self) -> Vec<ValidationRule> {
        let mut rules = self.rules.clone();
        rules.extend(self.expected_code.values().map(|pattern| ValidationRule {
            kind: super::RuleKind::Regex,
            pattern: pattern.clone(),
            message: self.failure_message.clone(),
            required: true,
        }));
        rules
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub chapter: u32,
    pub difficulty: Difficulty,
    pub estimated_minutes: u32,
    pub premium: bool,
    /// Coins granted on completion
    pub reward: u64,
    #[serde(default)]
    pub badge: Option<Badge>,
    /// Lessons that must be completed before this one unlocks
    #[serde(default)]
    pub required_lessons: Vec<u32>,
    pub steps: Vec<Step>,
}

impl Lesson {
    pub fn step(&self, step_id: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// The step after `step_id`, or None if it is the last one
    pub fn next_step(&self, step_id: u32) -> Option<&Step> {
        self.step(step_id.checked_add(1)?)
    }

    pub fn is_last_step(&self, step_id: u32) -> bool {
        self.steps.last().is_some_and(|s| s.id == step_id)
    }

    pub fn step_count(&self) -> u32 {
        self.steps.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RuleKind;

    fn ranch_step() -> Step {
        Step::code(1, "Owner field", "Add an owner")
            .expect(CodeLanguage::Rust, r"pub\s+owner:\s*Pubkey,")
            .expect(CodeLanguage::TypeScript, r"owner:\s*PublicKey")
            .messages("Owner added", "The ranch needs an owner")
    }

    #[test]
    fn test_rules_for_uses_language_pattern() {
        let rules = ranch_step().rules_for(CodeLanguage::TypeScript);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].kind, RuleKind::Regex);
        assert_eq!(rules[0].pattern, r"owner:\s*PublicKey");
        assert_eq!(rules[0].message, "The ranch needs an owner");
    }

    #[test]
    fn test_structured_rules_take_precedence() {
        let step = ranch_step().rule(ValidationRule::contains("struct Ranch", "Declare Ranch"));
        let rules = step.rules_for(CodeLanguage::Rust);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].kind, RuleKind::Contains);
    }

    #[test]
    fn test_missing_language_falls_back_to_first_pattern() {
        let step = Step::code(1, "t", "c").expect(CodeLanguage::Rust, "msg!");
        let rules = step.rules_for(CodeLanguage::TypeScript);
        assert_eq!(rules[0].pattern, "msg!");
    }

    #[test]
    fn test_quiz_answer_is_trimmed() {
        let quiz = Quiz::true_false("Solana uses proof of history", true);
        assert!(quiz.is_correct(" true\n"));
        assert!(!quiz.is_correct("True"));
    }

    #[test]
    fn test_language_parse() {
        assert_eq!(CodeLanguage::parse("TS"), Some(CodeLanguage::TypeScript));
        assert_eq!(CodeLanguage::parse("rs"), Some(CodeLanguage::Rust));
        assert_eq!(CodeLanguage::parse("cobol"), None);
    }
}
