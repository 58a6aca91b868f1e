//! Validation rule evaluator
//!
//! Pure evaluation of submitted code text against [`ValidationRule`]s. The
//! learner's code is never compiled or executed; every check is a text match.
//!
//! A regex pattern that fails to compile is reported as a failed rule whose
//! message names the pattern error. Catalog rules are checked when the catalog
//! is built, so this only happens for ad-hoc rules sent to the API.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{Quiz, RuleKind, ValidationRule};

/// Outcome of a single rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule: ValidationRule,
    pub passed: bool,
    pub message: String,
}

/// Outcome of evaluating a whole rule set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub success: bool,
    pub results: Vec<RuleResult>,
    /// Messages of failed required rules, in rule order
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }
}

/// Evaluate `code` against `rules`.
///
/// `success` is the AND over required rules; an empty rule set succeeds.
pub fn validate(code: &str, rules: &[ValidationRule]) -> ValidationResult {
    let mut results = Vec::with_capacity(rules.len());
    let mut errors = Vec::new();

    for rule in rules {
        let (passed, message) = match evaluate_rule(code, rule) {
            Ok(passed) => (passed, rule.message.clone()),
            Err(e) => (false, format!("{} (invalid pattern: {})", rule.message, e)),
        };

        if !passed && rule.required {
            errors.push(message.clone());
        }

        results.push(RuleResult {
            rule: rule.clone(),
            passed,
            message,
        });
    }

    ValidationResult {
        success: errors.is_empty(),
        results,
        errors,
    }
}

/// Evaluate a quiz answer in the same result shape as a code submission
pub fn validate_quiz(quiz: &Quiz, answer: &str) -> ValidationResult {
    let rule = ValidationRule {
        kind: RuleKind::Contains,
        pattern: quiz.correct_answer.clone(),
        message: format!("Incorrect answer to: {}", quiz.question),
        required: true,
    };
    let passed = quiz.is_correct(answer);
    let errors = if passed {
        Vec::new()
    } else {
        vec![rule.message.clone()]
    };

    ValidationResult {
        success: passed,
        results: vec![RuleResult {
            message: rule.message.clone(),
            rule,
            passed,
        }],
        errors,
    }
}

fn evaluate_rule(code: &str, rule: &ValidationRule) -> Result<bool, regex::Error> {
    let pattern = rule.pattern.as_str();
    let passed = match rule.kind {
        RuleKind::Contains => code.contains(pattern),
        RuleKind::Regex => Regex::new(pattern)?.is_match(code),
        RuleKind::FunctionExists => ["fn", "function"]
            .iter()
            .any(|kw| code.contains(&format!("{} {}", kw, pattern))),
        RuleKind::VariableExists => ["let", "var", "const"]
            .iter()
            .any(|kw| code.contains(&format!("{} {}", kw, pattern))),
    };
    Ok(passed)
}
