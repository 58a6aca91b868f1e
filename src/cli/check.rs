//! Check command implementation

use anyhow::{bail, Context, Result};
use std::path::Path;

use ranch_academy::catalog;
use ranch_academy::validation;
use ranch_academy::CodeLanguage;

/// Check a source file against a lesson step's rules, like the compile endpoint
pub async fn check_command(
    lesson_id: u32,
    step_id: u32,
    file: &Path,
    language: Option<String>,
) -> Result<()> {
    let language = match language.as_deref() {
        Some(name) => {
            CodeLanguage::parse(name).with_context(|| format!("Unsupported language: {}", name))?
        }
        None => language_from_extension(file),
    };

    let step = catalog::builtin()
        .get_step(lesson_id, step_id)
        .with_context(|| format!("Step {}.{} not found", lesson_id, step_id))?;
    if !step.requires_code {
        bail!("Step {}.{} is a quiz, not a code challenge", lesson_id, step_id);
    }

    let code = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let result = validation::validate(&code, &step.rules_for(language));

    println!("{} ({})\n", step.title, language);
    for rule in &result.results {
        let mark = match (rule.passed, rule.rule.required) {
            (true, _) => "ok",
            (false, true) => "FAILED",
            (false, false) => "skipped",
        };
        println!("  [{}] {}", mark, rule.message);
    }
    println!();

    if result.success {
        println!("{}", step.success_message);
        Ok(())
    } else {
        if let Some(hint) = &step.hint {
            println!("Hint: {}", hint);
        }
        bail!("{}", step.failure_message)
    }
}

fn language_from_extension(file: &Path) -> CodeLanguage {
    file.extension()
        .and_then(|ext| ext.to_str())
        .and_then(CodeLanguage::parse)
        .unwrap_or_default()
}
