use serde::{Deserialize, Serialize};

/// How a rule's pattern is matched against submitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Literal substring
    Contains,
    /// Regular expression, matched anywhere in the code
    Regex,
    /// `fn <name>` or `function <name>`
    FunctionExists,
    /// `let <name>`, `var <name>` or `const <name>`
    VariableExists,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Regex => "regex",
            Self::FunctionExists => "function_exists",
            Self::VariableExists => "variable_exists",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error raised when a rule is authored with a pattern that can never be evaluated
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid regex pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("empty pattern for {0} rule")]
    EmptyPattern(RuleKind),
}

/// A single pattern-based check applied to submitted code text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub pattern: String,
    /// Shown to the learner when the rule fails
    pub message: String,
    /// Optional rules are reported but never fail the step
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ValidationRule {
    fn new(kind: RuleKind, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
            message: message.into(),
            required: true,
        }
    }

    pub fn contains(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Contains, pattern, message)
    }

    /// Build a regex rule, rejecting patterns that do not compile
    pub fn regex(pattern: impl Into<String>, message: impl Into<String>) -> Result<Self, RuleError> {
        let rule = Self::new(RuleKind::Regex, pattern, message);
        rule.check()?;
        Ok(rule)
    }

    pub fn function_exists(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(RuleKind::FunctionExists, name, message)
    }

    pub fn variable_exists(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(RuleKind::VariableExists, name, message)
    }

    /// Mark the rule as advisory
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Authoring-time check: the pattern is non-empty and, for regex rules, compiles
    pub fn check(&self) -> Result<(), RuleError> {
        if self.pattern.is_empty() {
            return Err(RuleError::EmptyPattern(self.kind));
        }
        if self.kind == RuleKind::Regex {
            regex::Regex::new(&self.pattern).map_err(|source| RuleError::InvalidPattern {
                pattern: self.pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_rule_rejects_bad_pattern() {
        let err = ValidationRule::regex("pub struct (", "broken").unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
        assert!(err.to_string().contains("pub struct ("));
    }

    #[test]
    fn test_rule_wire_format() {
        let json = r#"{"type":"function_exists","pattern":"initialize","message":"Add initialize"}"#;
        let rule: ValidationRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.kind, RuleKind::FunctionExists);
        assert!(rule.required, "required defaults to true");

        let value = serde_json::to_value(ValidationRule::contains("msg!", "log it").optional()).unwrap();
        assert_eq!(value["type"], "contains");
        assert_eq!(value["required"], false);
    }

    #[test]
    fn test_empty_pattern_is_rejected() {
        let rule = ValidationRule::contains("", "nothing");
        assert!(matches!(rule.check(), Err(RuleError::EmptyPattern(RuleKind::Contains))));
    }
}
