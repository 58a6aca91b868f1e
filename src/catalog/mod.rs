//! Lesson catalog
//!
//! A read-only lookup surface over lessons defined at build time. Lookups for
//! unknown ids return `None`; nothing here mutates after construction.

mod builtin;
mod starter;

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;

use crate::domain::{CodeLanguage, Lesson, RuleError, Step};

/// Error raised when lesson data is inconsistent
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate lesson id {0}")]
    DuplicateLesson(u32),

    #[error("lesson {0} has no steps")]
    EmptyLesson(u32),

    #[error("lesson {lesson}: expected step id {expected}, found {found}")]
    NonSequentialSteps { lesson: u32, expected: u32, found: u32 },

    #[error("lesson {lesson} step {step}: {source}")]
    InvalidRule {
        lesson: u32,
        step: u32,
        #[source]
        source: RuleError,
    },

    #[error("lesson {lesson} step {step} needs either code rules or a quiz")]
    MissingCheck { lesson: u32, step: u32 },

    #[error("lesson {lesson} requires unknown lesson {required}")]
    UnknownPrerequisite { lesson: u32, required: u32 },
}

static BUILTIN: Lazy<LessonCatalog> = Lazy::new(|| {
    LessonCatalog::new(builtin::lessons())
        .map(|c| c.with_starter_code(starter::entries()))
        .expect("built-in lesson catalog is valid")
});

/// The lessons shipped with the application
pub fn builtin() -> &'static LessonCatalog {
    &BUILTIN
}

#[derive(Debug, Clone, Default)]
pub struct LessonCatalog {
    lessons: BTreeMap<u32, Lesson>,
    starter_code: BTreeMap<(String, CodeLanguage), String>,
}

impl LessonCatalog {
    /// Build a catalog, checking step numbering, rule patterns and prerequisites
    pub fn new(lessons: Vec<Lesson>) -> Result<Self, CatalogError> {
        let mut by_id = BTreeMap::new();
        for lesson in lessons {
            check_lesson(&lesson)?;
            let id = lesson.id;
            if by_id.insert(id, lesson).is_some() {
                return Err(CatalogError::DuplicateLesson(id));
            }
        }

        let ids: BTreeSet<u32> = by_id.keys().copied().collect();
        for lesson in by_id.values() {
            if let Some(&required) = lesson
                .required_lessons
                .iter()
                .find(|r| !ids.contains(*r) || **r == lesson.id)
            {
                return Err(CatalogError::UnknownPrerequisite {
                    lesson: lesson.id,
                    required,
                });
            }
        }

        Ok(Self {
            lessons: by_id,
            starter_code: BTreeMap::new(),
        })
    }

    pub fn with_starter_code<'a>(
        mut self,
        entries: impl IntoIterator<Item = (&'a str, CodeLanguage, &'a str)>,
    ) -> Self {
        for (key, language, code) in entries {
            self.starter_code
                .insert((key.to_string(), language), code.to_string());
        }
        self
    }

    pub fn get_lesson(&self, id: u32) -> Option<&Lesson> {
        self.lessons.get(&id)
    }

    /// All lessons ordered by chapter, then id
    pub fn all_lessons(&self) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self.lessons.values().collect();
        lessons.sort_by_key(|l| (l.chapter, l.id));
        lessons
    }

    pub fn get_step(&self, lesson_id: u32, step_id: u32) -> Option<&Step> {
        self.get_lesson(lesson_id)?.step(step_id)
    }

    pub fn next_step(&self, lesson_id: u32, step_id: u32) -> Option<&Step> {
        self.get_lesson(lesson_id)?.next_step(step_id)
    }

    /// Starter code for a step's key, falling back to the Rust variant
    pub fn starter_code(&self, key: &str, language: CodeLanguage) -> Option<&str> {
        self.starter_code
            .get(&(key.to_string(), language))
            .or_else(|| self.starter_code.get(&(key.to_string(), CodeLanguage::Rust)))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

fn check_lesson(lesson: &Lesson) -> Result<(), CatalogError> {
    if lesson.steps.is_empty() {
        return Err(CatalogError::EmptyLesson(lesson.id));
    }

    for (index, step) in lesson.steps.iter().enumerate() {
        let expected = index as u32 + 1;
        if step.id != expected {
            return Err(CatalogError::NonSequentialSteps {
                lesson: lesson.id,
                expected,
                found: step.id,
            });
        }

        let rules = step.all_rules();
        if (step.requires_code && rules.is_empty()) || (!step.requires_code && step.quiz.is_none())
        {
            return Err(CatalogError::MissingCheck {
                lesson: lesson.id,
                step: step.id,
            });
        }

        for rule in &rules {
            rule.check().map_err(|source| CatalogError::InvalidRule {
                lesson: lesson.id,
                step: step.id,
                source,
            })?;
        }
    }

    Ok(())
}
